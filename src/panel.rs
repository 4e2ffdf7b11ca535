//! Live control panel for [`ShadingParams`].

use egui::Ui;

use crate::params::{
    ShadingParams, AMPLITUDE_RANGE, NOISE_STRENGTH_RANGE, OCTAVE_RANGE, OPACITY_RANGE,
    SPATIAL_FREQUENCY_RANGE, SUBDIVISION_RANGE, TIME_FREQUENCY_RANGE, WAVELENGTH_RANGE,
};

/// Read-only stats shown under the sliders.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelStats {
    pub fps: f32,
    pub time: f32,
    pub triangles: usize,
    pub paused: bool,
}

/// Show the panel window. Returns true if any parameter changed.
pub fn show_panel(ctx: &egui::Context, params: &mut ShadingParams, stats: PanelStats) -> bool {
    let mut changed = false;

    egui::Window::new("Iridescence")
        .default_pos([12.0, 12.0])
        .resizable(false)
        .show(ctx, |ui| {
            changed = render_params(ui, params);
            ui.separator();
            render_stats(ui, &stats);
        });

    changed
}

/// Sliders for every parameter. Returns true if any changed.
pub fn render_params(ui: &mut Ui, params: &mut ShadingParams) -> bool {
    let mut changed = false;

    ui.heading("Noise");

    changed |= ui
        .add(
            egui::Slider::new(&mut params.time_frequency, TIME_FREQUENCY_RANGE)
                .text("Time Frequency")
                .fixed_decimals(3),
        )
        .on_hover_text("How fast the noise field scrolls")
        .changed();

    changed |= ui
        .add(
            egui::Slider::new(&mut params.spatial_frequency, SPATIAL_FREQUENCY_RANGE)
                .text("Spatial Frequency")
                .fixed_decimals(3),
        )
        .changed();

    changed |= ui
        .add(egui::Slider::new(&mut params.octaves, OCTAVE_RANGE).text("Octaves"))
        .on_hover_text("Fractal layers. More octaves add finer detail.")
        .changed();

    changed |= ui
        .add(egui::Slider::new(&mut params.amplitude, AMPLITUDE_RANGE).text("Amplitude"))
        .changed();

    changed |= ui
        .add(
            egui::Slider::new(&mut params.noise_strength, NOISE_STRENGTH_RANGE)
                .text("Noise Strength"),
        )
        .on_hover_text("Texture repeats across the surface")
        .changed();

    ui.separator();
    ui.heading("Surface");

    changed |= ui
        .add(egui::Slider::new(&mut params.opacity, OPACITY_RANGE).text("Opacity"))
        .changed();

    changed |= ui.checkbox(&mut params.wireframe, "Wireframe").changed();

    changed |= ui
        .add(egui::Slider::new(&mut params.subdivisions, SUBDIVISION_RANGE).text("Subdivisions"))
        .on_hover_text("Icosphere detail. The mesh is rebuilt when this changes.")
        .changed();

    ui.separator();
    ui.heading("Spectrum");

    changed |= ui
        .add(
            egui::Slider::new(&mut params.min_wavelength, WAVELENGTH_RANGE)
                .text("Min Wavelength")
                .suffix(" nm"),
        )
        .on_hover_text("Colour at grazing angles")
        .changed();

    changed |= ui
        .add(
            egui::Slider::new(&mut params.max_wavelength, WAVELENGTH_RANGE)
                .text("Max Wavelength")
                .suffix(" nm"),
        )
        .on_hover_text("Colour facing the camera")
        .changed();

    if ui.button("Reset to defaults").clicked() {
        *params = ShadingParams::default();
        changed = true;
    }

    changed
}

fn render_stats(ui: &mut Ui, stats: &PanelStats) {
    ui.label(
        egui::RichText::new(format!(
            "{:.0} fps · t = {:.2}{} · {} triangles",
            stats.fps,
            stats.time,
            if stats.paused { " (paused)" } else { "" },
            stats.triangles
        ))
        .small()
        .weak(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_runs_without_changes() {
        let ctx = egui::Context::default();
        let mut params = ShadingParams::default();
        let mut changed = true;

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            changed = show_panel(ctx, &mut params, PanelStats::default());
        });

        assert!(!changed);
        assert_eq!(params, ShadingParams::default());
    }
}
