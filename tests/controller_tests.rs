// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests driving the controller against in-memory services

use shutter::backends::memory::{MemoryLibrary, MemoryPermissions, MemoryPlatform};
use shutter::controller::Controller;
use shutter::errors::{AppError, CaptureError, LibraryError, PermissionError};
use shutter::session::{
    Asset, CameraFacing, FlashMode, Gate, ImageHandle, Notice, PermissionState, ReviewStage,
};

async fn ready(fakes: &MemoryPlatform) -> Controller {
    let mut controller = Controller::new(fakes.platform(), true);
    controller.start().await;
    controller.attach_camera();
    controller
}

#[tokio::test]
async fn test_take_picture_opens_review() {
    let fakes = MemoryPlatform::granted();
    let mut controller = ready(&fakes).await;

    assert_eq!(
        controller.take_picture().await,
        Some(Ok(ImageHandle::new("img://1")))
    );

    let session = controller.session();
    assert_eq!(session.active_image(), Some(&ImageHandle::new("img://1")));
    assert!(session.review_visible());
    assert_eq!(fakes.camera.captures().len(), 1);
}

#[tokio::test]
async fn test_capture_sends_facing_and_flash() {
    let fakes = MemoryPlatform::granted();
    let mut controller = ready(&fakes).await;
    controller.flip();
    controller.toggle_flash();

    controller.take_picture().await;

    let settings = fakes.camera.captures()[0];
    assert_eq!(settings.facing, CameraFacing::Front);
    assert_eq!(settings.flash, FlashMode::On);
}

#[tokio::test]
async fn test_second_capture_during_review_is_ignored() {
    let fakes = MemoryPlatform::granted();
    let mut controller = ready(&fakes).await;

    controller.take_picture().await;
    assert!(controller.take_picture().await.is_none());
    assert_eq!(fakes.camera.captures().len(), 1);
}

#[tokio::test]
async fn test_capture_failure_queues_notice() {
    let fakes = MemoryPlatform::granted();
    fakes.camera.push_result(Err(CaptureError::DeviceBusy));
    let mut controller = ready(&fakes).await;

    controller.take_picture().await;

    assert!(!controller.session().review_visible());
    assert!(matches!(
        controller.session().notice(),
        Some(Notice::CaptureFailed(_))
    ));
    assert!(controller.session().can_capture());
}

#[tokio::test]
async fn test_save_confirmed_persists_and_closes_review() {
    let fakes = MemoryPlatform::granted();
    let mut controller = ready(&fakes).await;
    controller.take_picture().await;

    assert!(controller.save());
    assert_eq!(
        controller.session().review().map(|r| r.stage()),
        Some(ReviewStage::Confirming)
    );
    let saved = controller.confirm_save().await;

    assert_eq!(saved, Some(Ok(Asset::new("asset-1", "img://1"))));
    assert_eq!(fakes.library.persisted(), vec![ImageHandle::new("img://1")]);
    assert_eq!(controller.session().notice(), Some(&Notice::PhotoSaved));
    assert!(!controller.session().review_visible());
}

#[tokio::test]
async fn test_save_cancelled_does_not_persist() {
    let fakes = MemoryPlatform::granted();
    let mut controller = ready(&fakes).await;
    controller.take_picture().await;

    controller.save();
    controller.cancel_save();

    assert!(fakes.library.persisted().is_empty());
    assert!(controller.session().review_visible());
    assert_eq!(controller.session().notice(), None);
}

#[tokio::test]
async fn test_save_failure_still_closes_review() {
    let fakes = MemoryPlatform::granted();
    fakes.library.fail_persist(LibraryError::Io("disk full".into()));
    let mut controller = ready(&fakes).await;
    controller.take_picture().await;

    controller.save();
    controller.confirm_save().await;

    assert!(!controller.session().review_visible());
    assert!(matches!(
        controller.session().notice(),
        Some(Notice::SaveFailed(_))
    ));
}

#[tokio::test]
async fn test_save_without_media_access_fails_softly() {
    let fakes = MemoryPlatform::new(
        MemoryPermissions::new(PermissionState::Granted, PermissionState::Denied),
        MemoryLibrary::new(),
    );
    let mut controller = ready(&fakes).await;
    assert_eq!(
        controller.dismiss_notice(),
        Some(Notice::MediaAccessNeededToSave)
    );

    controller.take_picture().await;
    controller.save();
    assert_eq!(
        controller.confirm_save().await,
        Some(Err(LibraryError::AccessDenied))
    );

    assert!(fakes.library.persisted().is_empty());
    assert!(!controller.session().review_visible());
    assert!(matches!(
        controller.session().notice(),
        Some(Notice::SaveFailed(_))
    ));
}

#[tokio::test]
async fn test_camera_denied_closes_gate() {
    let fakes = MemoryPlatform::new(
        MemoryPermissions::new(PermissionState::Denied, PermissionState::Granted),
        MemoryLibrary::new(),
    );
    let mut controller = Controller::new(fakes.platform(), true);

    assert_eq!(controller.start().await, Gate::Denied);
    controller.attach_camera();
    assert!(controller.take_picture().await.is_none());
}

#[tokio::test]
async fn test_load_images_toggles_gallery() {
    let assets = vec![Asset::new("a", "u1"), Asset::new("b", "u2")];
    let fakes = MemoryPlatform::new(
        MemoryPermissions::granted(),
        MemoryLibrary::with_assets(assets.clone()),
    );
    let mut controller = ready(&fakes).await;

    controller.load_images().await;
    assert_eq!(controller.session().assets(), assets.as_slice());
    assert!(controller.session().gallery_visible());

    controller.load_images().await;
    assert!(!controller.session().gallery_visible());
}

#[tokio::test]
async fn test_load_images_denied_keeps_previous_list() {
    let fakes = MemoryPlatform::new(
        MemoryPermissions::granted(),
        MemoryLibrary::with_assets(vec![Asset::new("a", "u1")]),
    );
    let mut controller = ready(&fakes).await;
    controller.load_images().await;

    fakes.permissions.set_media(PermissionState::Denied);
    fakes.library.set_assets(Vec::new());
    controller.load_images().await;

    assert_eq!(controller.session().assets().len(), 1);
    assert!(controller.session().gallery_visible());
    assert_eq!(
        controller.session().notice(),
        Some(&Notice::MediaAccessNeededToBrowse)
    );
}

#[tokio::test]
async fn test_load_images_failure_leaves_state() {
    let fakes = MemoryPlatform::granted();
    fakes.library.fail_list(LibraryError::Io("unreadable".into()));
    let mut controller = ready(&fakes).await;

    controller.load_images().await;

    assert!(!controller.session().gallery_visible());
    assert!(!controller.session().gallery_loading());
    assert!(matches!(
        controller.session().notice(),
        Some(Notice::GalleryLoadFailed(_))
    ));
}

#[tokio::test]
async fn test_saved_photo_appears_in_gallery() {
    let fakes = MemoryPlatform::granted();
    let mut controller = ready(&fakes).await;
    controller.take_picture().await;
    controller.save();
    controller.confirm_save().await;
    controller.dismiss_notice();

    controller.load_images().await;
    let first = &controller.session().assets()[0];
    assert_eq!(first.uri, ImageHandle::new("img://1"));

    assert!(controller.select_asset(0));
    assert_eq!(
        controller.session().active_image(),
        Some(&ImageHandle::new("img://1"))
    );
    assert!(!controller.session().gallery_visible());
}

#[tokio::test]
async fn test_take_and_save_reports_stored_asset() {
    let fakes = MemoryPlatform::granted();
    let mut controller = ready(&fakes).await;

    let asset = controller.take_and_save().await.unwrap();

    assert_eq!(asset.uri, ImageHandle::new("img://1"));
    assert_eq!(fakes.library.persisted(), vec![ImageHandle::new("img://1")]);
    assert!(!controller.session().review_visible());
}

#[tokio::test]
async fn test_take_and_save_without_camera_access() {
    let fakes = MemoryPlatform::new(
        MemoryPermissions::new(PermissionState::Denied, PermissionState::Granted),
        MemoryLibrary::new(),
    );
    let mut controller = ready(&fakes).await;

    assert_eq!(
        controller.take_and_save().await,
        Err(AppError::Permission(PermissionError::CameraDenied))
    );
    assert!(fakes.camera.captures().is_empty());
}

#[tokio::test]
async fn test_take_and_save_without_media_access() {
    let fakes = MemoryPlatform::new(
        MemoryPermissions::new(PermissionState::Granted, PermissionState::Denied),
        MemoryLibrary::new(),
    );
    let mut controller = ready(&fakes).await;

    assert_eq!(
        controller.take_and_save().await,
        Err(AppError::Permission(PermissionError::MediaLibraryDenied))
    );
    assert!(fakes.camera.captures().is_empty());
}

#[tokio::test]
async fn test_take_and_save_capture_failure() {
    let fakes = MemoryPlatform::granted();
    fakes.camera.push_result(Err(CaptureError::DeviceBusy));
    let mut controller = ready(&fakes).await;

    assert_eq!(
        controller.take_and_save().await,
        Err(AppError::Capture(CaptureError::DeviceBusy))
    );
    assert!(fakes.library.persisted().is_empty());
}

#[tokio::test]
async fn test_take_and_save_persist_failure() {
    let fakes = MemoryPlatform::granted();
    fakes.library.fail_persist(LibraryError::Io("disk full".into()));
    let mut controller = ready(&fakes).await;

    assert_eq!(
        controller.take_and_save().await,
        Err(AppError::Library(LibraryError::Io("disk full".into())))
    );
}
