//! Error reporting channels.
//!
//! Startup errors go to one of two channels picked on the command line: a
//! console line, or a small modal dialog window. Runtime notes (range
//! errors, rejected seeks) always go to the console.

use colored::Colorize;
use eframe::egui;

pub fn console(err: &anyhow::Error) {
    eprintln!("{} {err:#}", "error:".red().bold());
}

/// A recoverable runtime condition; the session continues.
pub fn note(message: impl std::fmt::Display) {
    eprintln!("{} {message}", "note:".yellow());
}

pub fn dialog(err: &anyhow::Error) {
    let message = format!("{err:#}");
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([440.0, 160.0])
            .with_title("slidecast"),
        ..Default::default()
    };
    let app = ErrorDialog {
        message: message.clone(),
    };
    let shown = eframe::run_native(
        "slidecast-error",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    );
    if shown.is_err() {
        // No display available after all; fall back to the console.
        eprintln!("{} {message}", "error:".red().bold());
    }
}

struct ErrorDialog {
    message: String,
}

impl eframe::App for ErrorDialog {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dismissed = ctx.input(|i| {
            i.key_pressed(egui::Key::Enter)
                || i.key_pressed(egui::Key::Escape)
                || i.key_pressed(egui::Key::Q)
        });
        if dismissed {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            ui.label(egui::RichText::new("Startup failed").strong());
            ui.add_space(4.0);
            ui.label(self.message.as_str());
            ui.add_space(12.0);
            if ui.button("OK").clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
    }
}
