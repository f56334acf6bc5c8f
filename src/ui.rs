use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::GreetingConfig;
use crate::constants::CARD_SIZE;
use crate::effects::{DecorKind, Decoration, LoveMeter, Timeline};
use crate::gallery::{
    Carousel, Direction, DisplayRefresh, DragVisual, GalleryBounds, NavigationRequest, NoteOverlay,
};
use crate::story::{AppPhase, StoryCommand, StoryState};

const ROSE: egui::Color32 = egui::Color32::from_rgb(255, 105, 180);
const CARD_FILL: egui::Color32 = egui::Color32::from_rgb(48, 18, 40);

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_photo_textures)
            .add_systems(Update, draw_story_ui.run_if(in_state(AppPhase::Story)))
            .add_systems(
                Update,
                (
                    draw_gallery_card,
                    draw_timeline,
                    draw_love_meter,
                    draw_note_overlay,
                )
                    .chain()
                    .run_if(in_state(AppPhase::Gallery)),
            )
            .add_systems(Update, draw_decorations);
    }
}

/// One image handle per configured photo, in gallery order
#[derive(Resource, Default)]
pub struct PhotoTextures(pub Vec<Handle<Image>>);

fn load_photo_textures(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<GreetingConfig>,
) {
    let handles = config
        .photos
        .iter()
        .map(|photo| asset_server.load(photo.image.clone()))
        .collect();
    commands.insert_resource(PhotoTextures(handles));
}

fn draw_story_ui(
    mut contexts: EguiContexts,
    config: Res<GreetingConfig>,
    story: Res<StoryState>,
    mut story_commands: EventWriter<StoryCommand>,
) {
    let ctx = contexts.ctx_mut();

    egui::Window::new("story")
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .default_width(CARD_SIZE[0] + 80.0)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                if let Some(chapter) = config.chapters.get(story.current() - 1) {
                    ui.label(egui::RichText::new(&chapter.emoji).size(48.0));
                    ui.heading(egui::RichText::new(&chapter.title).color(ROSE));
                    ui.add_space(8.0);
                    ui.label(&chapter.content);
                }
                ui.add_space(12.0);
                ui.add(egui::ProgressBar::new(story.progress()).desired_width(CARD_SIZE[0]));
                ui.label(story.label());
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(story.can_go_back(), egui::Button::new("◀ Previous"))
                        .clicked()
                    {
                        story_commands.write(StoryCommand::Previous);
                    }
                    if ui
                        .add_enabled(story.can_go_forward(), egui::Button::new("Next ▶"))
                        .clicked()
                    {
                        story_commands.write(StoryCommand::Next);
                    }
                    if ui.button("Skip to the photos").clicked() {
                        story_commands.write(StoryCommand::EnterGallery);
                    }
                });
            });
        });

    if story.completion_open() {
        egui::Window::new("story_complete")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new("💕").size(48.0));
                    ui.heading("Our story so far");
                    ui.label("Now let me show you the moments that made it.");
                    ui.add_space(8.0);
                    let button = egui::Button::new("View our memories 💖").fill(ROSE);
                    if ui.add(button).clicked() {
                        story_commands.write(StoryCommand::EnterGallery);
                    }
                });
            });
    }
}

fn draw_gallery_card(
    mut contexts: EguiContexts,
    config: Res<GreetingConfig>,
    textures: Option<Res<PhotoTextures>>,
    asset_server: Res<AssetServer>,
    carousel: Res<Carousel>,
    refresh: Res<DisplayRefresh>,
    drag_visual: Res<DragVisual>,
    mut bounds: ResMut<GalleryBounds>,
    mut requests: EventWriter<NavigationRequest>,
) {
    let displayed = refresh.displayed();
    let photo = displayed.and_then(|index| config.photos.get(index));

    // Texture ids must be registered before borrowing the context
    let texture = displayed
        .and_then(|index| textures.as_ref().and_then(|t| t.0.get(index)))
        .filter(|handle| asset_server.is_loaded_with_dependencies(handle.id()))
        .map(|handle| contexts.add_image(handle.clone_weak()));
    let ctx = contexts.ctx_mut();

    let pose = refresh.pose();
    let feedback = drag_visual.0;
    let scale = pose.scale * feedback.map_or(1.0, |f| f.scale());
    let brightness = feedback.map_or(1.0, |f| f.brightness());
    let size = egui::vec2(CARD_SIZE[0], CARD_SIZE[1]) * scale;

    egui::Area::new(egui::Id::new("gallery_card"))
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, -pose.lift))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                let response = match texture {
                    Some(texture_id) => {
                        let level = (255.0 * pose.opacity.clamp(0.0, 1.0)) as u8;
                        let tint = egui::Color32::from_rgba_unmultiplied(255, 255, 255, level)
                            .gamma_multiply(brightness.min(1.2));
                        let image = egui::Image::new(egui::load::SizedTexture::new(texture_id, size))
                            .fit_to_exact_size(size)
                            .tint(tint)
                            .rotate(pose.tilt, egui::vec2(0.5, 0.5))
                            .corner_radius(12.0);
                        ui.add(image)
                    }
                    None => {
                        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::hover());
                        ui.painter().rect_filled(rect, 12.0, CARD_FILL);
                        let placeholder = photo.map_or("💖", |photo| photo.alt.as_str());
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            placeholder,
                            egui::FontId::proportional(18.0),
                            egui::Color32::WHITE.gamma_multiply(pose.opacity),
                        );
                        response
                    }
                };

                if feedback.is_some_and(|f| f.glow()) {
                    ui.painter().rect_stroke(
                        response.rect,
                        12.0,
                        egui::Stroke::new(3.0, ROSE),
                        egui::StrokeKind::Outside,
                    );
                }
                bounds.0 = Some(Rect::new(
                    response.rect.min.x,
                    response.rect.min.y,
                    response.rect.max.x,
                    response.rect.max.y,
                ));

                if let Some(photo) = photo {
                    ui.label(egui::RichText::new(&photo.label).color(ROSE).size(18.0));
                }
                ui.label(format!(
                    "{} / {}",
                    carousel.current_index() + 1,
                    carousel.photo_count()
                ));
                ui.horizontal(|ui| {
                    if ui.button("◀").clicked() {
                        requests.write(NavigationRequest::Advance(Direction::Backward));
                    }
                    if ui.button("▶").clicked() {
                        requests.write(NavigationRequest::Advance(Direction::Forward));
                    }
                });
                ui.small("Swipe or use the arrow keys. Tap the photo for a note.");
            });
        });
}

fn draw_timeline(
    mut contexts: EguiContexts,
    config: Res<GreetingConfig>,
    mut timeline: ResMut<Timeline>,
    mut requests: EventWriter<NavigationRequest>,
) {
    let ctx = contexts.ctx_mut();

    egui::Area::new(egui::Id::new("timeline_toggle"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(16.0, 16.0))
        .show(ctx, |ui| {
            if ui.button(timeline.toggle_icon()).clicked() {
                timeline.toggle();
            }
        });

    if !timeline.is_open() {
        return;
    }

    egui::SidePanel::left("timeline")
        .resizable(false)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.add_space(40.0);
            ui.heading("Our memories");
            ui.separator();
            let highlighted = timeline.highlighted();
            for (index, photo) in config.photos.iter().enumerate() {
                let text = egui::RichText::new(format!("💖 {}", photo.label));
                let text = if index == highlighted {
                    text.color(ROSE).strong()
                } else {
                    text
                };
                if ui.selectable_label(index == highlighted, text).clicked() {
                    requests.write(NavigationRequest::JumpTo(index));
                }
            }
        });
}

fn draw_love_meter(mut contexts: EguiContexts, meter: Res<LoveMeter>) {
    if !meter.is_visible() {
        return;
    }
    let reading = meter.reading();

    egui::Area::new(egui::Id::new("love_meter"))
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 16.0))
        .show(contexts.ctx_mut(), |ui| {
            ui.vertical_centered(|ui| {
                ui.label(format!("{} Love Meter", reading.level.emoji));
                ui.add(
                    egui::ProgressBar::new(reading.progress / 100.0)
                        .desired_width(240.0)
                        .fill(ROSE)
                        .text(format!("{:.0}%", reading.progress)),
                );
                ui.label(reading.level.text);
                ui.label("💖".repeat(reading.hearts));
            });
        });
}

fn draw_note_overlay(mut contexts: EguiContexts, mut overlay: ResMut<NoteOverlay>) {
    let Some(text) = overlay.text().map(str::to_owned) else {
        return;
    };
    let ctx = contexts.ctx_mut();
    let screen = ctx.screen_rect();

    // Dimmed backdrop; clicking it closes the note
    let backdrop = egui::Area::new(egui::Id::new("note_backdrop"))
        .fixed_pos(screen.min)
        .order(egui::Order::Middle)
        .show(ctx, |ui| {
            let response = ui.allocate_rect(screen, egui::Sense::click());
            ui.painter()
                .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(160));
            response.clicked()
        })
        .inner;

    let mut close = backdrop;
    egui::Window::new("note")
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .order(egui::Order::Foreground)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .max_width(CARD_SIZE[0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new("💌").size(36.0));
                ui.label(egui::RichText::new(text).size(18.0));
                ui.add_space(8.0);
                if ui.button("Close").clicked() {
                    close = true;
                }
            });
        });

    if close {
        overlay.close();
    }
}

fn draw_decorations(mut contexts: EguiContexts, decorations: Query<&Decoration>) {
    let ctx = contexts.ctx_mut();
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("decorations"),
    ));

    for decoration in decorations.iter().filter(|d| d.is_visible()) {
        let alpha = decoration.alpha();
        let position = decoration.position();
        let center = egui::pos2(position.x, position.y);
        let size = decoration.size * decoration.scale();
        let white = egui::Color32::WHITE.gamma_multiply(alpha);

        match &decoration.kind {
            DecorKind::Glyph(glyph) => {
                let galley =
                    painter.layout_no_wrap(glyph.clone(), egui::FontId::proportional(size), white);
                let top_left = center - galley.size() * 0.5;
                painter.add(
                    egui::epaint::TextShape::new(top_left, galley, white)
                        .with_angle(decoration.rotation()),
                );
            }
            DecorKind::Dot([r, g, b]) => {
                let color = egui::Color32::from_rgb(*r, *g, *b).gamma_multiply(alpha);
                painter.circle_filled(center, size * 0.5, color);
            }
            DecorKind::Message(text) => {
                painter.text(
                    center,
                    egui::Align2::CENTER_CENTER,
                    text,
                    egui::FontId::proportional(size),
                    ROSE.gamma_multiply(alpha),
                );
            }
            DecorKind::Toast(text) => {
                let galley =
                    painter.layout_no_wrap(text.clone(), egui::FontId::proportional(size), white);
                let rect = egui::Align2::RIGHT_TOP
                    .anchor_size(center, galley.size())
                    .expand(8.0);
                painter.rect_filled(rect, 16.0, ROSE.gamma_multiply(alpha * 0.85));
                painter.galley(rect.shrink(8.0).min, galley, white);
            }
            DecorKind::Banner(text) => {
                let galley = painter.layout(
                    text.clone(),
                    egui::FontId::proportional(size),
                    white,
                    CARD_SIZE[0] + 120.0,
                );
                let rect = egui::Align2::CENTER_CENTER
                    .anchor_size(center, galley.size())
                    .expand(24.0);
                painter.rect_filled(rect, 20.0, CARD_FILL.gamma_multiply(alpha * 0.95));
                painter.rect_stroke(
                    rect,
                    20.0,
                    egui::Stroke::new(2.0, ROSE.gamma_multiply(alpha)),
                    egui::StrokeKind::Inside,
                );
                painter.galley(rect.shrink(24.0).min, galley, white);
            }
        }
    }
}
