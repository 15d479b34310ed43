use eframe::egui;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::deck::{ImageDeck, SlideDeck};
use crate::error::{Error, Result};
use crate::player::{AudioPlayer, FeedEvent};
use crate::probe;
use crate::report;
use crate::session::{Affordance, Command, Effect, SeekRequest, Session, SessionOptions};
use crate::timeline::Timeline;

const DEFAULT_WIDTH: i32 = 1280;
const DEFAULT_HEIGHT: i32 = 720;
const DEFAULT_SEEK_STEP_SECS: f64 = 5.0;

// OSD strip geometry, in logical pixels from the window bottom.
const OSD_HEIGHT: f32 = 24.0;
const OSD_ICON_REGION: f32 = 24.0;
const OSD_BAR_LEFT: f32 = 26.0;
const OSD_BAR_RIGHT_MARGIN: f32 = 28.0;
const OSD_INSET: f32 = 2.0;

const FEED_POLL: Duration = Duration::from_millis(100);

/// Fully resolved launch settings: command line over config file over
/// built-in defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub description: PathBuf,
    pub audio: Option<PathBuf>,
    pub slides: Option<PathBuf>,
    pub width: i32,
    pub height: i32,
    pub options: SessionOptions,
}

impl Settings {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        description: PathBuf,
        audio: Option<PathBuf>,
        slides: Option<PathBuf>,
        width: Option<i32>,
        height: Option<i32>,
        no_osd: bool,
        no_progress: bool,
        config: &Config,
    ) -> Result<Self> {
        let defaults = config.defaults.clone().unwrap_or_default();

        let width = width.or(defaults.width).unwrap_or(DEFAULT_WIDTH);
        let height = height.or(defaults.height).unwrap_or(DEFAULT_HEIGHT);
        if width <= 0 || height <= 0 {
            return Err(Error::config(format!(
                "Invalid video dimensions {width}x{height}"
            )));
        }

        let seek_step_secs = defaults.seek_step_secs.unwrap_or(DEFAULT_SEEK_STEP_SECS);
        if !seek_step_secs.is_finite() || seek_step_secs <= 0.0 {
            return Err(Error::config(format!(
                "Invalid seek step: {seek_step_secs}"
            )));
        }

        Ok(Self {
            description,
            audio,
            slides,
            width,
            height,
            options: SessionOptions {
                osd_enabled: !no_osd && defaults.osd.unwrap_or(true),
                progress_bar: !no_progress && defaults.progress_bar.unwrap_or(true),
                seek_step_secs,
            },
        })
    }
}

/// Build the whole session up front, then hand it to the window. Every
/// fatal error surfaces here, before any window or playback exists.
pub fn run(settings: Settings) -> anyhow::Result<()> {
    let paths = probe::resolve_companions(
        &settings.description,
        settings.audio.clone(),
        settings.slides.clone(),
    )?;
    let timeline = Timeline::load(&paths.description)?;
    if timeline.is_empty() {
        report::note("Description lists no slide events; slides advance manually only");
    }
    let deck = ImageDeck::open(&paths.slides)?;
    let player = AudioPlayer::open(&paths.audio)?;
    let session = Session::new(timeline, deck.len(), settings.options);

    let deck_name = paths
        .slides
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| paths.slides.display().to_string());
    let title = format!("slidecast \u{2014} {deck_name}");

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([settings.width as f32, settings.height as f32])
        .with_title(&title);
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(PlayerApp::new(session, Box::new(deck), player)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

struct PlayerApp {
    session: Session,
    deck: Box<dyn SlideDeck>,
    player: AudioPlayer,
    /// Texture of the slide currently on screen, uploaded only when the
    /// resolved index changes.
    texture: Option<egui::TextureHandle>,
    /// Cached panel rect from last frame, used for pointer hit-testing.
    last_rect: egui::Rect,
    started: bool,
}

impl PlayerApp {
    fn new(session: Session, deck: Box<dyn SlideDeck>, player: AudioPlayer) -> Self {
        Self {
            session,
            deck,
            player,
            texture: None,
            last_rect: egui::Rect::ZERO,
            started: false,
        }
    }

    fn dispatch(&mut self, ctx: &egui::Context, command: Command) {
        let effects = self.session.handle(command);
        self.apply_effects(ctx, effects);
    }

    fn apply_effects(&mut self, ctx: &egui::Context, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ShowSlide(None) => {
                    self.texture = None;
                }
                Effect::ShowSlide(Some(index)) => match self.deck.render_page(index) {
                    Ok(page) => {
                        let size = [page.width() as usize, page.height() as usize];
                        let pixels = egui::ColorImage::from_rgba_unmultiplied(size, page.as_raw());
                        self.texture = Some(ctx.load_texture(
                            format!("slide-{index}"),
                            pixels,
                            egui::TextureOptions::LINEAR,
                        ));
                    }
                    // Keep whatever is on screen.
                    Err(err) => report::note(err),
                },
                Effect::SetPaused(paused) => self.player.set_paused(paused),
                Effect::Seek(request) => {
                    let accepted = match request {
                        SeekRequest::By(delta_secs) => self.player.seek_by(delta_secs),
                        SeekRequest::To(secs) => self.player.seek_to(secs),
                    };
                    if !accepted {
                        report::note("Seek rejected by the audio backend");
                    }
                }
                Effect::RefreshOsd | Effect::SetProgress(_) => ctx.request_repaint(),
                Effect::Report(err) => report::note(err),
            }
        }
    }

    fn bar_extent(rect: egui::Rect) -> (f32, f32) {
        (
            rect.left() + OSD_BAR_LEFT,
            rect.right() - OSD_BAR_RIGHT_MARGIN,
        )
    }

    /// Map a pointer release inside the OSD strip to a command: the icon
    /// region toggles pause, the bar region scrubs (x maps linearly to an
    /// absolute position).
    fn osd_hit_test(&self, pos: egui::Pos2) -> Option<Command> {
        if !self.session.osd_visible() {
            return None;
        }
        let rect = self.last_rect;
        let strip_top = rect.bottom() - OSD_HEIGHT;
        if !rect.contains(pos) || pos.y < strip_top {
            return None;
        }

        if pos.x - rect.left() < OSD_ICON_REGION {
            return Some(Command::TogglePause);
        }

        if self.session.options().progress_bar {
            let (left, right) = Self::bar_extent(rect);
            let in_bar = pos.x >= left
                && pos.x < right
                && pos.y >= strip_top + OSD_INSET
                && pos.y < rect.bottom() - OSD_INSET;
            if in_bar && self.player.is_seekable() {
                if let Some(duration) = self.player.duration_secs() {
                    let fraction = ((pos.x - left) / (right - left)).clamp(0.0, 1.0) as f64;
                    return Some(Command::SeekTo {
                        secs: fraction * duration,
                    });
                }
            }
        }
        None
    }

    fn draw_slide(&self, ui: &egui::Ui, rect: egui::Rect) {
        let Some(texture) = &self.texture else {
            return;
        };
        let size = texture.size_vec2();
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let scale = (rect.width() / size.x).min(rect.height() / size.y);
        let slide_rect = egui::Rect::from_center_size(rect.center(), size * scale);
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        ui.painter()
            .image(texture.id(), slide_rect, uv, egui::Color32::WHITE);
    }

    fn draw_osd(&self, ui: &egui::Ui, rect: egui::Rect) {
        let strip = egui::Rect::from_min_max(
            egui::pos2(rect.left(), rect.bottom() - OSD_HEIGHT),
            rect.max,
        );
        ui.painter().rect_filled(strip, 0.0, egui::Color32::BLACK);

        let top = strip.top() + OSD_INSET;
        let bottom = strip.bottom() - OSD_INSET;

        match self.session.affordance() {
            Some(Affordance::Play) => {
                let points = vec![
                    egui::pos2(strip.left() + 3.0, top),
                    egui::pos2(strip.left() + 21.0, strip.center().y),
                    egui::pos2(strip.left() + 3.0, bottom),
                ];
                ui.painter().add(egui::Shape::convex_polygon(
                    points,
                    egui::Color32::WHITE,
                    egui::Stroke::NONE,
                ));
            }
            Some(Affordance::Pause) => {
                for (x0, x1) in [(2.0, 9.0), (14.0, 21.0)] {
                    let bar = egui::Rect::from_min_max(
                        egui::pos2(strip.left() + x0, top),
                        egui::pos2(strip.left() + x1, bottom),
                    );
                    ui.painter().rect_filled(bar, 0.0, egui::Color32::WHITE);
                }
            }
            None => {}
        }

        if self.session.options().progress_bar {
            let (left, right) = Self::bar_extent(rect);
            if right > left {
                let track = egui::Rect::from_min_max(
                    egui::pos2(left, top),
                    egui::pos2(right, bottom),
                );
                ui.painter().rect_stroke(
                    track,
                    0.0,
                    egui::Stroke::new(1.0, egui::Color32::from_gray(96)),
                    egui::StrokeKind::Inside,
                );
                let fill_right = left + (right - left) * self.session.progress();
                if fill_right > left {
                    let fill = egui::Rect::from_min_max(
                        egui::pos2(left, top),
                        egui::pos2(fill_right, bottom),
                    );
                    ui.painter().rect_filled(fill, 0.0, egui::Color32::WHITE);
                }
            }
        }
    }
}

impl eframe::App for PlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Playback was queued paused; release it once the window is up.
        if !self.started {
            self.started = true;
            self.dispatch(ctx, Command::TogglePause);
        }

        // Drain the position feed strictly in delivery order. Null payloads
        // mean "no definite position yet" and drive nothing.
        let events: Vec<FeedEvent> = self.player.try_events().collect();
        for event in events {
            let command = match event {
                FeedEvent::Position(Some(secs)) => Command::ClockUpdate {
                    position_secs: secs,
                },
                FeedEvent::Progress(Some(fraction)) => Command::Progress { fraction },
                FeedEvent::Position(None) | FeedEvent::Progress(None) => continue,
            };
            self.dispatch(ctx, command);
        }

        let mut commands: Vec<Command> = Vec::new();
        let mut quit = false;
        let seekable = self.player.is_seekable();
        let seek_step = self.session.options().seek_step_secs;

        ctx.input(|i| {
            if i.key_pressed(egui::Key::Q) || i.key_pressed(egui::Key::Escape) {
                quit = true;
                return;
            }
            if i.key_pressed(egui::Key::ArrowLeft) && seekable {
                commands.push(Command::SeekBy {
                    delta_secs: -seek_step,
                });
            }
            if i.key_pressed(egui::Key::ArrowRight) && seekable {
                commands.push(Command::SeekBy {
                    delta_secs: seek_step,
                });
            }
            if i.key_pressed(egui::Key::ArrowUp) {
                commands.push(Command::StepForward);
            }
            if i.key_pressed(egui::Key::ArrowDown) {
                commands.push(Command::StepBackward);
            }
            if i.key_pressed(egui::Key::P) || i.key_pressed(egui::Key::Space) {
                commands.push(Command::TogglePause);
            }
            if i.key_pressed(egui::Key::O) {
                commands.push(Command::ToggleOsd);
            }
            if i.pointer.button_released(egui::PointerButton::Primary) {
                if let Some(pos) = i.pointer.latest_pos() {
                    if let Some(command) = self.osd_hit_test(pos) {
                        commands.push(command);
                    }
                }
            }
        });

        // Sent outside the input closure (sending inside deadlocks egui's
        // input lock).
        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        for command in commands {
            self.dispatch(ctx, command);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::BLACK).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.last_rect = rect;
                ui.painter().rect_filled(rect, 0.0, egui::Color32::BLACK);
                self.draw_slide(ui, rect);
                if self.session.osd_visible() {
                    self.draw_osd(ui, rect);
                }
            });

        // Keep polling the feed while idle.
        ctx.request_repaint_after(FEED_POLL);
    }
}
