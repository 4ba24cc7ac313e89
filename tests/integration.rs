use std::sync::Arc;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use xplat_storage::storage::{FileAccessMode, StorageItemTypes, UnsupportedFileSystem};
use xplat_storage::utils::logging::setup_test_logging;
use xplat_storage::{
    CollisionPolicy, StorageConfig, StorageContext, StorageError, StorageFile, StorageFolder,
    StorageItemHandle,
};

// Helper to create a temporary root folder with its own context
fn setup() -> (TempDir, StorageFolder) {
    setup_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let ctx = StorageContext::new(&StorageConfig::default());
    let root = StorageFolder::from_path_in(ctx, dir.path()).unwrap();
    (dir, root)
}

async fn names(folder: &StorageFolder) -> Vec<String> {
    folder
        .get_items()
        .await
        .unwrap()
        .iter()
        .map(|item| item.name())
        .collect()
}

#[tokio::test]
async fn create_file_twice_with_fail_if_exists() {
    let (_dir, root) = setup();
    root.create_file("a.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();

    let err = root
        .create_file("a.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap_err();
    assert!(err.is_already_exists());
}

#[tokio::test]
async fn create_file_replace_existing_clears_content() {
    let (_dir, root) = setup();
    let original = root
        .create_file("a.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    original.write_text("old content").await.unwrap();

    let replaced = root
        .create_file("a.txt", CollisionPolicy::ReplaceExisting)
        .await
        .unwrap();

    assert_eq!(replaced.name(), "a.txt");
    assert_eq!(replaced.read_text().await.unwrap(), "");
    assert_eq!(replaced.get_basic_properties().await.unwrap().size, 0);
    assert_eq!(names(&root).await, vec!["a.txt"]);
}

#[tokio::test]
async fn create_file_generate_unique_name_keeps_original() {
    let (_dir, root) = setup();
    let original = root
        .create_file("a.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    original.write_text("keep me").await.unwrap();

    let unique = root
        .create_file("a.txt", CollisionPolicy::GenerateUniqueName)
        .await
        .unwrap();

    assert_ne!(unique.name(), "a.txt");
    assert!(unique.name().contains("a.txt"));
    assert_eq!(original.read_text().await.unwrap(), "keep me");
    assert_eq!(root.get_files().await.unwrap().len(), 2);
}

#[tokio::test]
async fn create_file_open_if_exists_returns_existing() {
    let (_dir, root) = setup();
    let original = root
        .create_file("a.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    original.write_text("still here").await.unwrap();

    let opened = root
        .create_file("a.txt", CollisionPolicy::OpenIfExists)
        .await
        .unwrap();

    assert!(opened.is_equal(&original));
    assert_eq!(opened.read_text().await.unwrap(), "still here");
}

#[tokio::test]
async fn create_folder_policies() {
    let (_dir, root) = setup();
    let docs = root
        .create_folder("docs", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    docs.create_file("inner.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();

    let err = root
        .create_folder("docs", CollisionPolicy::FailIfExists)
        .await
        .unwrap_err();
    assert!(err.is_already_exists());

    let unique = root
        .create_folder("docs", CollisionPolicy::GenerateUniqueName)
        .await
        .unwrap();
    assert!(unique.name().starts_with("docs-"));

    let replaced = root
        .create_folder("docs", CollisionPolicy::ReplaceExisting)
        .await
        .unwrap();
    assert!(replaced.get_items().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_default_uses_configured_policy() {
    setup_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        default_collision_policy: CollisionPolicy::OpenIfExists,
        ..StorageConfig::default()
    };
    let root = StorageFolder::from_path_in(StorageContext::new(&config), dir.path()).unwrap();

    let first = root.create_file_default("a.txt").await.unwrap();
    let second = root.create_file_default("a.txt").await.unwrap();
    assert!(first.is_equal(&second));
}

#[tokio::test]
async fn get_file_or_create_on_missing_name() {
    let (_dir, root) = setup();
    let file = root.get_file_or_create("new.txt").await.unwrap();

    assert!(file.exists().await);
    assert_eq!(file.name(), "new.txt");

    let again = root.get_file_or_create("new.txt").await.unwrap();
    assert!(again.is_equal(&file));
}

#[tokio::test]
async fn get_file_and_folder_not_found() {
    let (_dir, root) = setup();
    assert!(root.get_file("missing.txt").await.unwrap_err().is_not_found());
    assert!(root.get_folder("missing").await.unwrap_err().is_not_found());

    let folder = root.get_folder_or_create("made").await.unwrap();
    assert!(folder.exists().await);
}

#[tokio::test]
async fn text_round_trip() {
    let (_dir, root) = setup();
    let file = root
        .create_file("text.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();

    for text in ["", "hello", "ünïcødé ✓ 日本語 🚀", "line one\nline two\r\n"] {
        file.write_text(text).await.unwrap();
        assert_eq!(file.read_text().await.unwrap(), text);
    }
}

#[tokio::test]
async fn bytes_round_trip_and_invalid_utf8() {
    let (_dir, root) = setup();
    let file = root
        .create_file("data.bin", CollisionPolicy::FailIfExists)
        .await
        .unwrap();

    let bytes = vec![0xff, 0xfe, 0x00, 0x42];
    file.write_bytes(&bytes).await.unwrap();
    assert_eq!(file.read_bytes().await.unwrap(), bytes);

    match file.read_text().await {
        Err(StorageError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::InvalidData),
        other => panic!("expected invalid data, got {other:?}"),
    }
}

#[tokio::test]
async fn stream_is_owned_by_caller() {
    let (_dir, root) = setup();
    let file = root
        .create_file("stream.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();

    let mut stream = file.open(FileAccessMode::ReadWrite).await.unwrap();
    stream.write_all(b"streamed").await.unwrap();
    stream.flush().await.unwrap();
    drop(stream);

    let mut reader = file.open_read().await.unwrap();
    let mut content = String::new();
    reader.read_to_string(&mut content).await.unwrap();
    assert_eq!(content, "streamed");
}

#[tokio::test]
async fn deleted_folder_takes_descendants() {
    let (_dir, root) = setup();
    let parent = root
        .create_folder("parent", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    let child = parent
        .create_folder("child", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    let leaf = child
        .create_file("leaf.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();

    parent.delete().await.unwrap();

    assert!(!leaf.exists().await);
    assert!(!child.exists().await);
    assert!(parent.get_items().await.unwrap_err().is_not_found());
    assert!(parent.delete().await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn items_are_direct_children_folders_first() {
    let (_dir, root) = setup();
    root.create_file("b.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    root.create_file("a.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    let sub = root
        .create_folder("zeta", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    sub.create_file("nested.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();

    assert_eq!(names(&root).await, vec!["zeta", "a.txt", "b.txt"]);
    assert_eq!(root.get_files().await.unwrap().len(), 2);
    assert_eq!(root.get_folders().await.unwrap().len(), 1);
}

#[tokio::test]
async fn items_range_clamps() {
    let (_dir, root) = setup();
    for name in ["a", "b", "c"] {
        root.create_file(name, CollisionPolicy::FailIfExists)
            .await
            .unwrap();
    }

    let window = root.get_items_range(1, 5).await.unwrap();
    let window: Vec<_> = window.iter().map(|item| item.name()).collect();
    assert_eq!(window, vec!["b", "c"]);

    assert!(root.get_items_range(10, 2).await.unwrap().is_empty());
    assert!(root.get_items_range(0, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn get_item_resolves_kind() {
    let (_dir, root) = setup();
    root.create_file("file.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    root.create_folder("dir", CollisionPolicy::FailIfExists)
        .await
        .unwrap();

    let file = root.get_item("file.txt").await.unwrap();
    assert!(file.is_of_type(StorageItemTypes::File));
    assert!(file.as_file().is_some());

    let folder = root.get_item("dir").await.unwrap();
    assert!(folder.is_of_type(StorageItemTypes::Folder));

    assert!(root.get_item("nothing").await.unwrap_err().is_not_found());
    assert!(root.try_get_item("nothing").await.is_none());
    assert!(root.try_get_item("").await.is_none());
    assert!(root.try_get_item("dir").await.is_some());
}

#[tokio::test]
async fn rename_rules() {
    let (_dir, root) = setup();
    let mut file = root
        .create_file("a.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    root.create_file("b.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();

    assert!(file.rename("A.TXT", CollisionPolicy::FailIfExists).await.unwrap_err().is_invalid_argument());
    assert!(file.rename("", CollisionPolicy::FailIfExists).await.unwrap_err().is_invalid_argument());
    assert!(file.rename("b.txt", CollisionPolicy::FailIfExists).await.unwrap_err().is_already_exists());
    assert!(file.rename("c.txt", CollisionPolicy::OpenIfExists).await.unwrap_err().is_invalid_argument());

    file.write_text("from a").await.unwrap();
    file.rename_default("b.txt").await.unwrap();
    assert_eq!(file.name(), "b.txt");
    assert_eq!(file.read_text().await.unwrap(), "from a");
    assert_eq!(names(&root).await, vec!["b.txt"]);
}

#[tokio::test]
async fn rename_folder_follows_handle() {
    let (_dir, root) = setup();
    let mut folder = root
        .create_folder("old", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    folder
        .create_file("kept.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    root.create_folder("taken", CollisionPolicy::FailIfExists)
        .await
        .unwrap();

    folder
        .rename("taken", CollisionPolicy::GenerateUniqueName)
        .await
        .unwrap();
    assert!(folder.name().starts_with("taken-"));
    assert!(folder.get_file("kept.txt").await.is_ok());

    folder.rename("final", CollisionPolicy::FailIfExists).await.unwrap();
    assert_eq!(folder.name(), "final");
    assert!(folder.exists().await);
}

#[tokio::test]
async fn move_defaults_to_replace() {
    let (_dir, root) = setup();
    let src = root
        .create_folder("src", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    let dst = root
        .create_folder("dst", CollisionPolicy::FailIfExists)
        .await
        .unwrap();

    let mut file = src
        .create_file("a.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    file.write_text("new").await.unwrap();
    let existing = dst
        .create_file("a.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    existing.write_text("old").await.unwrap();

    file.move_into(&dst).await.unwrap();

    assert_eq!(file.get_parent().await.unwrap().name(), "dst");
    assert_eq!(file.read_text().await.unwrap(), "new");
    assert!(src.get_items().await.unwrap().is_empty());
    assert_eq!(dst.get_files().await.unwrap().len(), 1);
}

#[tokio::test]
async fn move_to_missing_folder_is_not_found() {
    let (_dir, root) = setup();
    let mut file = root
        .create_file("a.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    let ghost = StorageFolder::from_path_in(
        Arc::clone(root.context()),
        root.path().join("ghost"),
    )
    .unwrap();

    let err = file
        .move_to(&ghost, "a.txt", CollisionPolicy::ReplaceExisting)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(file.exists().await);
}

#[tokio::test]
async fn move_onto_itself_is_a_no_op() {
    let (_dir, root) = setup();
    let mut file = root
        .create_file("a.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    file.write_text("safe").await.unwrap();

    file.move_into(&root).await.unwrap();
    assert_eq!(file.read_text().await.unwrap(), "safe");
}

#[tokio::test]
async fn move_between_volumes_keeps_content() {
    let (_dir, root) = setup();
    // tmpfs is usually a separate device from the temp dir
    let shm = std::path::Path::new("/dev/shm");
    let other = if shm.is_dir() {
        tempfile::tempdir_in(shm).unwrap()
    } else {
        tempfile::tempdir().unwrap()
    };
    let destination =
        StorageFolder::from_path_in(Arc::clone(root.context()), other.path()).unwrap();

    let mut file = root
        .create_file("travel.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    file.write_text("across").await.unwrap();
    let source = file.path().to_path_buf();

    file.move_to(&destination, "travel.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();

    assert_eq!(file.path(), other.path().join("travel.txt"));
    assert_eq!(file.read_text().await.unwrap(), "across");
    assert!(!source.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn create_over_dangling_link_stays_in_folder() {
    let (dir, root) = setup();
    let outside = tempfile::tempdir().unwrap();
    let escaped = outside.path().join("escaped.txt");
    let link = dir.path().join("link.txt");
    std::os::unix::fs::symlink(&escaped, &link).unwrap();

    let err = root
        .create_file("link.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap_err();
    assert!(err.is_already_exists());
    assert!(!escaped.exists());

    let file = root
        .create_file("link.txt", CollisionPolicy::ReplaceExisting)
        .await
        .unwrap();
    assert!(!escaped.exists());
    assert!(std::fs::symlink_metadata(file.path()).unwrap().is_file());
}

#[tokio::test]
async fn copy_policies() {
    let (_dir, root) = setup();
    let dst = root
        .create_folder("dst", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    let file = root
        .create_file("a.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    file.write_text("payload").await.unwrap();

    let copy = file.copy_into(&dst).await.unwrap();
    assert_eq!(copy.read_text().await.unwrap(), "payload");
    assert!(file.exists().await);

    assert!(file.copy_into(&dst).await.unwrap_err().is_already_exists());

    let second = file
        .copy(&dst, "a.txt", CollisionPolicy::GenerateUniqueName)
        .await
        .unwrap();
    assert!(second.name().contains("a.txt"));
    assert_ne!(second.name(), "a.txt");

    let err = file
        .copy(&dst, "b.txt", CollisionPolicy::OpenIfExists)
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());

    let err = file
        .copy(&root, "a.txt", CollisionPolicy::ReplaceExisting)
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(file.read_text().await.unwrap(), "payload");
}

#[tokio::test]
async fn copy_and_move_replace_existing_files() {
    let (_dir, root) = setup();
    let source = root
        .create_file("source.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    source.write_text("fresh").await.unwrap();
    let target = root
        .create_file("target.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    target.write_text("stale").await.unwrap();

    source.copy_and_replace(&target).await.unwrap();
    assert_eq!(target.read_text().await.unwrap(), "fresh");
    assert!(source.exists().await);

    let mut mover = source.clone();
    mover.write_text("moved").await.unwrap();
    mover.move_and_replace(&target).await.unwrap();
    assert!(mover.is_equal(&target));
    assert_eq!(target.read_text().await.unwrap(), "moved");
    assert!(!source.exists().await);

    let ghost = StorageFile::from_path_in(
        Arc::clone(root.context()),
        root.path().join("ghost.txt"),
    )
    .unwrap();
    assert!(target.copy_and_replace(&ghost).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn stale_handles_report_not_found() {
    let (_dir, root) = setup();
    let file = root
        .create_file("gone.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    file.delete().await.unwrap();

    assert!(file.read_text().await.unwrap_err().is_not_found());
    assert!(file.write_text("x").await.unwrap_err().is_not_found());
    assert!(file.open_read().await.unwrap_err().is_not_found());
    assert!(file.get_basic_properties().await.unwrap_err().is_not_found());
    assert!(file.delete().await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn properties_and_parent() {
    let (_dir, root) = setup();
    let file = root
        .create_file("sized.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap();
    file.write_text("12345").await.unwrap();

    let props = file.get_basic_properties().await.unwrap();
    assert_eq!(props.size, 5);
    assert!(file.date_created().await.is_ok());

    let folder_attrs = root.attributes().await.unwrap();
    assert!(folder_attrs.contains(xplat_storage::storage::FileAttributes::DIRECTORY));
    assert!(file.is_of_type(StorageItemTypes::File));
    assert!(file.get_parent().await.unwrap().is_equal(&root));
}

#[tokio::test]
async fn factories_validate_paths() {
    setup_test_logging();
    assert!(StorageFolder::from_path("").unwrap_err().is_invalid_argument());
    assert!(StorageFile::from_path("relative.txt").unwrap().path().is_absolute());

    let dir = tempfile::tempdir().unwrap();
    let ctx = StorageContext::new(&StorageConfig::default());
    assert!(
        StorageFile::try_from_path_in(Arc::clone(&ctx), dir.path().join("none.txt"))
            .await
            .is_none()
    );
    std::fs::write(dir.path().join("some.txt"), b"x").unwrap();
    assert!(
        StorageFile::try_from_path_in(Arc::clone(&ctx), dir.path().join("some.txt"))
            .await
            .is_some()
    );

    std::fs::create_dir(dir.path().join("inner")).unwrap();
    let folder =
        StorageFolder::from_path_in(Arc::clone(&ctx), dir.path().join("inner").join("..")).unwrap();
    assert_eq!(folder.path(), dir.path());
    assert_eq!(
        folder.name(),
        dir.path().file_name().unwrap().to_string_lossy()
    );
    let parent = folder.get_parent().await.unwrap();
    assert_eq!(parent.path(), dir.path().parent().unwrap());

    let file =
        StorageFile::from_path_in(ctx, dir.path().join(".").join("inner").join("..").join("some.txt"))
            .unwrap();
    assert_eq!(file.path(), dir.path().join("some.txt"));
    assert_eq!(file.name(), "some.txt");
    assert_eq!(file.read_text().await.unwrap(), "x");
}

#[tokio::test]
async fn unsupported_backend_surfaces_not_found_or_unsupported() {
    setup_test_logging();
    let ctx = StorageContext::with_host(Arc::new(UnsupportedFileSystem), &StorageConfig::default());
    let folder = StorageFolder::from_path_in(ctx, "/anywhere").unwrap();

    assert!(!folder.exists().await);
    assert!(folder
        .create_file("a.txt", CollisionPolicy::FailIfExists)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn concurrent_creates_on_distinct_names() {
    let (_dir, root) = setup();
    let mut tasks = Vec::new();
    for i in 0..16 {
        let root = root.clone();
        tasks.push(tokio::spawn(async move {
            root.create_file(&format!("file-{i:02}.txt"), CollisionPolicy::FailIfExists)
                .await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(root.get_files().await.unwrap().len(), 16);
}
