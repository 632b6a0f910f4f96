// SPDX-License-Identifier: GPL-3.0-only

//! Fluent localisation

use crate::session::Notice;
use i18n_embed::{
    DefaultLocalizer, LanguageLoader, Localizer,
    fluent::{FluentLanguageLoader, fluent_language_loader},
    unic_langid::LanguageIdentifier,
};
use rust_embed::RustEmbed;
use std::sync::LazyLock;

/// Load the requested languages, falling back to English
pub fn init(requested_languages: &[LanguageIdentifier]) {
    if let Err(why) = localizer().select(requested_languages) {
        tracing::error!(error = %why, "Failed to load translations");
    }
}

#[must_use]
pub fn localizer() -> Box<dyn Localizer> {
    Box::from(DefaultLocalizer::new(&*LANGUAGE_LOADER, &Localizations))
}

#[derive(RustEmbed)]
#[folder = "i18n/"]
struct Localizations;

pub static LANGUAGE_LOADER: LazyLock<FluentLanguageLoader> = LazyLock::new(|| {
    let loader: FluentLanguageLoader = fluent_language_loader!();

    loader
        .load_fallback_language(&Localizations)
        .expect("Error while loading fallback language");

    loader
});

/// Request a localized string by ID from the i18n/ directory
#[macro_export]
macro_rules! fl {
    ($message_id:literal) => {{
        i18n_embed_fl::fl!($crate::i18n::LANGUAGE_LOADER, $message_id)
    }};

    ($message_id:literal, $($args:expr),*) => {{
        i18n_embed_fl::fl!($crate::i18n::LANGUAGE_LOADER, $message_id, $($args), *)
    }};
}

/// Title and body of a notice dialog
pub fn notice_text(notice: &Notice) -> (String, String) {
    match notice {
        Notice::MediaAccessNeededToSave => {
            (fl!("notice-permission-title"), fl!("notice-media-needed-save"))
        }
        Notice::MediaAccessNeededToBrowse => {
            (fl!("notice-permission-title"), fl!("notice-media-needed-browse"))
        }
        Notice::PhotoSaved => (fl!("notice-saved-title"), fl!("notice-saved")),
        Notice::SaveFailed(reason) => (
            fl!("notice-error-title"),
            fl!("notice-save-failed", reason = reason.as_str()),
        ),
        Notice::CaptureFailed(reason) => (
            fl!("notice-error-title"),
            fl!("notice-capture-failed", reason = reason.as_str()),
        ),
        Notice::GalleryLoadFailed(reason) => (
            fl!("notice-error-title"),
            fl!("notice-gallery-failed", reason = reason.as_str()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_failure_carries_reason() {
        let (_, body) = notice_text(&Notice::SaveFailed("disk full".to_string()));
        assert!(body.contains("disk full"));
    }

    #[test]
    fn english_is_the_fallback() {
        let (title, _) = notice_text(&Notice::PhotoSaved);
        assert!(!title.is_empty());
        assert_eq!(fl!("gallery-load"), "Load images");
    }
}
