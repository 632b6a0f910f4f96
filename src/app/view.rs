// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! Layers, bottom to top:
//! - camera preview with the flip and flash overlay buttons
//! - capture and gallery buttons, and the thumbnail grid when loaded
//! - review modal over everything while an image is held
//! - white screen flash while the flash fires

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use crate::i18n::notice_text;
use crate::session::{Gate, GridLayout, ImageHandle, ReviewStage};
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Border, Color, ContentFit, Length};
use cosmic::widget::{self, icon};

/// Flash icon SVG (lightning bolt)
const FLASH_ICON: &[u8] = include_bytes!("../../resources/button_icons/flash.svg");
/// Flash off icon SVG (lightning bolt with strike-through)
const FLASH_OFF_ICON: &[u8] = include_bytes!("../../resources/button_icons/flash-off.svg");

fn black_background(_theme: &cosmic::Theme) -> widget::container::Style {
    widget::container::Style {
        background: Some(Background::Color(Color::BLACK)),
        ..Default::default()
    }
}

fn with_tooltip<'a>(
    content: impl Into<Element<'a, Message>>,
    label: String,
) -> Element<'a, Message> {
    widget::tooltip(content, widget::text::body(label), widget::tooltip::Position::Top).into()
}

/// Image widget source for a platform handle, when it points at a local file
fn image_source(handle: &ImageHandle) -> Option<widget::image::Handle> {
    handle.to_path().map(widget::image::Handle::from_path)
}

impl AppModel {
    pub fn view(&self) -> Element<'_, Message> {
        match self.session.gate() {
            // Nothing is drawn until the camera permission is known
            Gate::Pending => widget::Space::new(Length::Fill, Length::Fill).into(),
            Gate::Denied => self.view_denied(),
            Gate::Open => self.view_camera(),
        }
    }

    fn view_denied(&self) -> Element<'_, Message> {
        widget::container(
            widget::column()
                .push(widget::text::title3(fl!("camera-access-denied")))
                .push(widget::text::body(fl!("camera-access-denied-hint")))
                .spacing(cosmic::theme::spacing().space_s)
                .align_x(Alignment::Center),
        )
        .center(Length::Fill)
        .into()
    }

    fn view_camera(&self) -> Element<'_, Message> {
        let preview = self.build_preview();

        if self.flash_active {
            let flash_overlay = widget::container(widget::Space::new(Length::Fill, Length::Fill))
                .width(Length::Fill)
                .height(Length::Fill)
                .style(|_theme| widget::container::Style {
                    background: Some(Background::Color(Color::WHITE)),
                    ..Default::default()
                });
            return cosmic::iced::widget::stack![preview, flash_overlay]
                .width(Length::Fill)
                .height(Length::Fill)
                .into();
        }

        let spacing = cosmic::theme::spacing();
        let height = if self.session.gallery_visible() {
            Length::FillPortion(1)
        } else {
            Length::Fill
        };
        let mut controls = widget::column()
            .push(preview)
            .spacing(spacing.space_xs)
            .padding([0, spacing.space_s, spacing.space_s, spacing.space_s])
            .height(height);

        if self.session.capture_button_visible() {
            controls = controls.push(self.build_capture_button());
        }
        if self.session.gallery_enabled() {
            controls = controls.push(self.build_gallery_button());
        }

        // The grid spans the full width so its margins add up to it
        let mut content = widget::column().push(controls);
        if self.session.gallery_visible() {
            content = content.push(self.build_gallery_grid());
        }

        let main: Element<'_, Message> = content.width(Length::Fill).height(Length::Fill).into();

        if self.session.review_visible() {
            cosmic::iced::widget::stack![main, self.build_review_modal()]
                .width(Length::Fill)
                .height(Length::Fill)
                .into()
        } else {
            main
        }
    }

    /// Live preview with the flip button bottom-left and flash bottom-right
    fn build_preview(&self) -> Element<'_, Message> {
        let feed: Element<'_, Message> = match (&self.preview, &self.preview_error) {
            (Some(frame), _) => widget::image::Image::new(frame.clone())
                .content_fit(ContentFit::Cover)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            (None, Some(error)) => widget::container(widget::text::body(error.clone()))
                .center(Length::Fill)
                .into(),
            (None, None) => widget::container(widget::text::body(fl!("waiting-for-camera")))
                .center(Length::Fill)
                .into(),
        };

        let flip_icon = icon::from_name("camera-switch-symbolic");
        let flip_button = widget::button::icon(flip_icon)
            .icon_size(ui::OVERLAY_ICON_SIZE)
            .on_press(Message::FlipCamera);
        let flip_button = with_tooltip(flip_button, fl!("flip-camera"));

        let flash_on = self.session.flash().is_on();
        let flash_icon_bytes = if flash_on { FLASH_ICON } else { FLASH_OFF_ICON };
        let flash_icon = icon::from_svg_bytes(flash_icon_bytes).symbolic(true);
        let flash_label = if flash_on { fl!("flash-on") } else { fl!("flash-off") };
        let flash_button = widget::button::icon(flash_icon)
            .icon_size(ui::OVERLAY_ICON_SIZE)
            .on_press(Message::ToggleFlash)
            .class(if flash_on {
                cosmic::theme::Button::Suggested
            } else {
                cosmic::theme::Button::Standard
            });
        let flash_button = with_tooltip(flash_button, flash_label);

        let controls = widget::container(
            widget::row()
                .push(flip_button)
                .push(widget::horizontal_space())
                .push(flash_button)
                .align_y(Alignment::End),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .align_y(cosmic::iced::alignment::Vertical::Bottom)
        .padding(ui::OVERLAY_MARGIN);

        widget::container(cosmic::iced::widget::stack![feed, controls])
            .width(Length::Fill)
            .height(Length::Fill)
            .style(black_background)
            .into()
    }

    fn action_button<'a>(
        &self,
        content: Element<'a, Message>,
        on_press: Option<Message>,
    ) -> Element<'a, Message> {
        widget::button::custom(widget::container(content).center(Length::Fill))
            .width(Length::Fill)
            .height(Length::Fixed(ui::ACTION_BUTTON_HEIGHT))
            .class(cosmic::theme::Button::Suggested)
            .on_press_maybe(on_press)
            .into()
    }

    fn build_capture_button(&self) -> Element<'_, Message> {
        let on_press = self.session.can_capture().then_some(Message::Capture);
        let button = self.action_button(
            icon::from_name("camera-photo-symbolic").size(ui::OVERLAY_ICON_SIZE).into(),
            on_press,
        );
        with_tooltip(button, fl!("take-picture"))
    }

    fn build_gallery_button(&self) -> Element<'_, Message> {
        let label = if self.session.gallery_visible() {
            fl!("gallery-close")
        } else {
            fl!("gallery-load")
        };
        let on_press = (!self.session.gallery_loading()).then_some(Message::LoadImages);
        self.action_button(widget::text::body(label).into(), on_press)
    }

    /// Three-column thumbnail grid, spacing fixed from the first window width
    fn build_gallery_grid(&self) -> Element<'_, Message> {
        let assets = self.session.assets();
        if assets.is_empty() {
            return widget::container(widget::text::body(fl!("gallery-empty")))
                .center_x(Length::Fill)
                .height(Length::FillPortion(1))
                .into();
        }

        let grid = self
            .grid
            .unwrap_or_else(|| GridLayout::from_width(ui::WINDOW_WIDTH));
        let mut rows = widget::column();
        for range in grid.rows(assets.len()) {
            let mut row = widget::row();
            for index in range {
                let thumbnail: Element<'_, Message> = match image_source(&assets[index].uri) {
                    Some(source) => widget::image::Image::new(source)
                        .content_fit(ContentFit::Cover)
                        .width(Length::Fixed(grid.cell))
                        .height(Length::Fixed(grid.cell))
                        .into(),
                    None => widget::container(icon::from_name("image-x-generic-symbolic").size(32))
                        .center(Length::Fixed(grid.cell))
                        .into(),
                };
                let cell = widget::button::custom(thumbnail)
                    .padding(0)
                    .class(cosmic::theme::Button::Image)
                    .on_press(Message::SelectAsset(index));
                row = row.push(widget::container(cell).padding(grid.margin));
            }
            rows = rows.push(row);
        }

        widget::scrollable(rows)
            .width(Length::Fill)
            .height(Length::FillPortion(1))
            .into()
    }

    /// Full-screen review of the held image with discard and save
    fn build_review_modal(&self) -> Element<'_, Message> {
        let Some(review) = self.session.review() else {
            return widget::Space::new(Length::Shrink, Length::Shrink).into();
        };

        let image: Element<'_, Message> = match image_source(review.image()) {
            Some(source) => widget::image::Image::new(source)
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fixed(ui::REVIEW_IMAGE_HEIGHT))
                .into(),
            None => widget::container(widget::text::body(review.image().to_string()))
                .center_x(Length::Fill)
                .height(Length::Fixed(ui::REVIEW_IMAGE_HEIGHT))
                .into(),
        };
        let framed = widget::container(image)
            .width(Length::Fill)
            .style(|_theme| widget::container::Style {
                border: Border {
                    radius: ui::REVIEW_IMAGE_RADIUS.into(),
                    ..Default::default()
                },
                ..Default::default()
            });

        let busy = review.stage() == ReviewStage::Saving;
        let discard = widget::button::custom(
            icon::from_name("window-close-symbolic").size(ui::REVIEW_ICON_SIZE),
        )
        .class(cosmic::theme::Button::Destructive)
        .on_press_maybe((!busy).then_some(Message::DiscardPhoto));
        let discard = with_tooltip(discard, fl!("discard-photo"));
        let save = widget::button::custom(
            icon::from_name("document-save-symbolic").size(ui::REVIEW_ICON_SIZE),
        )
        .class(cosmic::theme::Button::Suggested)
        .on_press_maybe((review.stage() == ReviewStage::Viewing).then_some(Message::SavePhoto));
        let save = with_tooltip(save, fl!("save-photo"));

        let mut actions = widget::row()
            .push(discard)
            .push(save)
            .spacing(cosmic::theme::spacing().space_l)
            .align_y(Alignment::Center);
        if busy {
            actions = actions.push(widget::text::body(fl!("saving-photo")));
        }

        widget::container(
            widget::column()
                .push(framed)
                .push(actions)
                .spacing(cosmic::theme::spacing().space_m)
                .align_x(Alignment::Center)
                .padding(ui::OVERLAY_MARGIN),
        )
        .center(Length::Fill)
        .style(black_background)
        .into()
    }

    /// Save confirmation first, otherwise the oldest notice
    pub fn view_dialog(&self) -> Option<Element<'_, Message>> {
        if let Some(review) = self.session.review()
            && review.stage() == ReviewStage::Confirming
        {
            return Some(
                widget::dialog()
                    .title(fl!("save-photo-title"))
                    .body(fl!("save-photo-question"))
                    .primary_action(widget::button::suggested(fl!("ok")).on_press(Message::ConfirmSave))
                    .secondary_action(
                        widget::button::standard(fl!("cancel")).on_press(Message::CancelSave),
                    )
                    .into(),
            );
        }

        let notice = self.session.notice()?;
        let (title, body) = notice_text(notice);
        let icon_name = if notice.is_error() {
            "dialog-warning-symbolic"
        } else {
            "emblem-ok-symbolic"
        };
        Some(
            widget::dialog()
                .title(title)
                .body(body)
                .icon(icon::from_name(icon_name).size(64))
                .primary_action(widget::button::suggested(fl!("dismiss")).on_press(Message::DismissNotice))
                .into(),
        )
    }
}
