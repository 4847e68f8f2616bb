use std::path::Path;

use bracket_lens::config::AppConfig;
use bracket_lens::state::AppState;
use eframe::egui;

use crate::ui::{bubbles, panels};

/// Simulation steps per rendered frame while the layout is warm.
const TICKS_PER_FRAME: usize = 2;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BracketLensApp {
    pub state: AppState,
}

impl BracketLensApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }

    pub fn open(&mut self, path: &Path) {
        panels::load_into(&mut self.state, path);
    }
}

impl eframe::App for BracketLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selectors ----
        egui::SidePanel::left("selector_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: bubbles ----
        egui::CentralPanel::default().show(ctx, |ui| {
            bubbles::bubble_canvas(ui, &mut self.state);
        });

        // Advance the layout a little each frame so input stays responsive.
        let was_warm = self.state.simulation.is_warm();
        let mut warm = false;
        for _ in 0..TICKS_PER_FRAME {
            warm = self.state.simulation.tick();
            if !warm {
                break;
            }
        }
        if warm {
            ctx.request_repaint();
        } else if was_warm {
            log::debug!("layout settled after {} ticks", self.state.simulation.ticks());
        }
    }
}
