// SPDX-License-Identifier: GPL-3.0-only

//! Settings drawer view

use crate::app::state::{AppModel, ContextPage, Message};
use crate::fl;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::widget;

impl AppModel {
    /// Theme, gallery and photo folder settings
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let theme_dropdown = widget::dropdown(
            &self.theme_options,
            Some(self.config.app_theme.index()),
            Message::SetAppTheme,
        );

        let appearance = widget::settings::section()
            .title(fl!("appearance"))
            .add(widget::settings::item::builder(fl!("theme")).control(theme_dropdown));

        let gallery_toggle =
            widget::toggler(self.config.gallery_enabled).on_toggle(Message::SetGalleryEnabled);
        let photo_dir = self.config.photo_directory().display().to_string();

        let gallery = widget::settings::section()
            .title(fl!("gallery-section"))
            .add(widget::settings::item::builder(fl!("gallery-enabled")).control(gallery_toggle))
            .add(
                widget::settings::item::builder(fl!("photo-folder"))
                    .description(photo_dir)
                    .control(
                        widget::button::standard(fl!("open-photo-folder"))
                            .on_press(Message::OpenPhotoFolder),
                    ),
            );

        let content: Element<'_, Message> = widget::settings::view_column(vec![
            appearance.into(),
            gallery.into(),
        ])
        .into();

        context_drawer::context_drawer(content, Message::ToggleContextPage(ContextPage::Settings))
            .title(fl!("settings"))
    }
}
