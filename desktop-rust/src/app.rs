use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui::{self, Color32, RichText};
use eframe::egui::{FontData, FontDefinitions, FontFamily};
use food_detect::config::{Config, Endpoint};
use food_detect_common::{AnalysisResponse, Detection, Phase, WorkflowState};
use tracing::{debug, warn};

use crate::io::{spawn_select, spawn_submit};
use crate::model::{DecodedImage, UiMessage};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];
const PANEL_IMAGE_SIZE: egui::Vec2 = egui::vec2(420.0, 320.0);

const AMBER: Color32 = Color32::from_rgb(180, 83, 9);
const AMBER_LIGHT: Color32 = Color32::from_rgb(254, 243, 199);
const RED: Color32 = Color32::from_rgb(185, 28, 28);
const GREEN: Color32 = Color32::from_rgb(22, 101, 52);

pub struct DesktopApp {
    state: WorkflowState,
    endpoint: Option<Endpoint>,
    status: String,
    loading_file: bool,
    preview: Option<egui::TextureHandle>,
    annotated: Option<egui::TextureHandle>,
    pending_preview: Option<DecodedImage>,
    pending_annotated: Option<DecodedImage>,
    tx: Sender<UiMessage>,
    rx: Receiver<UiMessage>,
}

impl Default for DesktopApp {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        let (endpoint, status) = match Config::load() {
            Ok(config) => {
                let endpoint = config.resolve_endpoint(None);
                let status = match &endpoint {
                    Some(endpoint) => format!("Endpoint: {} ({})", endpoint.url, endpoint.source),
                    None => "Endpoint not configured".to_string(),
                };
                (endpoint, status)
            }
            Err(err) => {
                warn!("config load failed: {err}");
                (Config::default().resolve_endpoint(None), format!("Config load failed: {err}"))
            }
        };

        Self {
            state: WorkflowState::new(),
            endpoint,
            status,
            loading_file: false,
            preview: None,
            annotated: None,
            pending_preview: None,
            pending_annotated: None,
            tx,
            rx,
        }
    }
}

impl DesktopApp {
    fn open_image(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.loading_file = true;
            spawn_select(path, self.tx.clone());
        }
    }

    fn run_detect(&mut self) {
        let Some(image) = self.state.selected().cloned() else {
            return;
        };
        match self.state.begin_submit() {
            Ok(ticket) => {
                self.annotated = None;
                let endpoint = self.endpoint.as_ref().map(|e| e.url.clone());
                spawn_submit(ticket, image, endpoint, self.tx.clone());
            }
            Err(err) => self.status = err.to_string(),
        }
    }

    fn poll_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::Selected { outcome, decoded } => {
                    self.loading_file = false;
                    match outcome {
                        Ok(image) => {
                            self.status = format!("Selected {}", image.file_name);
                            self.state.select(image);
                            self.preview = None;
                            self.annotated = None;
                            self.pending_preview = decoded;
                            self.pending_annotated = None;
                        }
                        Err(err) => self.status = format!("Load failed: {err}"),
                    }
                }
                UiMessage::Finished { ticket, outcome, annotated } => {
                    let accepted = match outcome {
                        Ok(response) => self.state.resolve(ticket, response),
                        Err(err) => self.state.fail(ticket, err),
                    };
                    if accepted {
                        self.pending_annotated = annotated;
                    } else {
                        debug!(ticket = ticket.value(), "stale result discarded");
                    }
                }
            }
        }
    }

    fn process_pending_images(&mut self, ctx: &egui::Context) {
        if let Some(image) = self.pending_preview.take() {
            self.preview = Some(load_texture(ctx, "preview", image));
        }
        if let Some(image) = self.pending_annotated.take() {
            self.annotated = Some(load_texture(ctx, "annotated", image));
        }
    }

    fn render_upload(&mut self, ui: &mut egui::Ui) {
        section_frame(AMBER_LIGHT).show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new("Upload Your Food Image").color(AMBER).strong());
                ui.add_space(6.0);
                if ui
                    .add_enabled(!self.loading_file, egui::Button::new("📂 Open Image..."))
                    .clicked()
                {
                    self.open_image();
                }
                ui.label(RichText::new("PNG, JPG, GIF").color(Color32::from_gray(120)));
            });

            if let Some(image) = self.state.selected() {
                ui.add_space(8.0);
                ui.label(RichText::new(format!("✔ Selected: {}", image.file_name)).strong());
                if let Some(texture) = &self.preview {
                    ui.add(egui::Image::new(texture).max_size(PANEL_IMAGE_SIZE));
                } else if let Some(reason) = image.preview.warning() {
                    ui.label(RichText::new(format!("⚠ {reason}")).color(AMBER));
                }
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let in_flight = self.state.is_in_flight();
                let label = if in_flight {
                    "Analyzing Your Dish..."
                } else {
                    "🔍 Detect Central Asian Cuisine"
                };
                if ui
                    .add_enabled(self.state.can_submit(), egui::Button::new(label))
                    .clicked()
                {
                    self.run_detect();
                }
                if in_flight {
                    ui.spinner();
                }
            });
        });
    }

    fn render_error(&self, ui: &mut egui::Ui, message: &str) {
        section_frame(Color32::from_rgb(254, 226, 226)).show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.heading(RichText::new("⚠ Error Occurred").color(RED).strong());
            ui.label(RichText::new(message).color(RED));
        });
    }

    fn render_results(&self, ui: &mut egui::Ui, response: &AnalysisResponse) {
        section_frame(AMBER_LIGHT).show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new("Detection Results").color(AMBER).strong());
                let (badge, color) = if response.is_success() {
                    ("✅ Detection Successful", GREEN)
                } else {
                    ("❌ Detection Failed", RED)
                };
                ui.label(RichText::new(badge).color(color).strong().size(16.0));
            });
            ui.separator();

            ui.columns(2, |columns| {
                columns[0].label(RichText::new("📷 Original Image").strong());
                match &self.preview {
                    Some(texture) => {
                        columns[0].add(egui::Image::new(texture).max_size(PANEL_IMAGE_SIZE));
                    }
                    None => {
                        columns[0].label("No image selected");
                    }
                }

                columns[1].label(RichText::new("🎯 Detected Cuisine").strong());
                match (&self.annotated, &response.image) {
                    (Some(texture), _) => {
                        columns[1].add(egui::Image::new(texture).max_size(PANEL_IMAGE_SIZE));
                    }
                    (None, Some(_)) => {
                        columns[1].label("Processed image could not be decoded");
                    }
                    (None, None) => {
                        columns[1].label("No processed image returned");
                    }
                }
            });

            let detections = response.detections();
            if !detections.is_empty() {
                ui.add_space(10.0);
                ui.heading(
                    RichText::new(format!("🍴 Identified Dishes ({})", response.display_count()))
                        .color(AMBER)
                        .strong(),
                );
                for detection in detections {
                    render_detection(ui, detection);
                    ui.add_space(4.0);
                }
            }

            if let Some(msg) = &response.msg {
                ui.add_space(8.0);
                ui.label(RichText::new(msg).color(Color32::from_rgb(30, 64, 175)));
            }

            ui.add_space(8.0);
            ui.collapsing("📋 View Raw JSON Response", |ui| {
                let raw = serde_json::to_string_pretty(response).unwrap_or_default();
                ui.label(RichText::new(raw).monospace().size(11.0));
            });
        });
    }
}

fn render_detection(ui: &mut egui::Ui, detection: &Detection) {
    section_frame(Color32::from_rgb(255, 251, 235)).show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(RichText::new(detection.display_label()).strong().size(15.0));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(detection.confidence_percent())
                        .color(RED)
                        .strong()
                        .size(15.0),
                );
            });
        });
        ui.add(egui::ProgressBar::new(detection.top_confidence.clamp(0.0, 1.0) as f32));
        ui.horizontal(|ui| {
            ui.label(RichText::new("Bounding Box:").size(11.0));
            ui.label(RichText::new(detection.bbox_display()).monospace().size(11.0));
        });
    });
}

fn section_frame(fill: Color32) -> egui::Frame {
    egui::Frame::none()
        .fill(fill)
        .stroke(egui::Stroke::new(1.0, Color32::from_rgb(252, 211, 77)))
        .rounding(egui::Rounding::same(10.0))
        .inner_margin(egui::Margin::same(12.0))
}

fn load_texture(ctx: &egui::Context, name: &str, image: DecodedImage) -> egui::TextureHandle {
    let color_image = egui::ColorImage::from_rgba_unmultiplied(image.size, &image.pixels);
    ctx.load_texture(name, color_image, egui::TextureOptions::default())
}

const CJK_FONT_CANDIDATES: &[&str] = &[
    r"C:\Windows\Fonts\meiryo.ttc",
    r"C:\Windows\Fonts\msgothic.ttc",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
];
const CJK_FONT_NAME: &str = "cjk_fallback";

/// 最初に読めたCJKフォントを補助フォントとして登録
pub fn configure_fonts(ctx: &egui::Context) {
    let Some(data) = CJK_FONT_CANDIDATES
        .iter()
        .find_map(|path| std::fs::read(path).ok())
    else {
        debug!("no CJK font found, using egui defaults");
        return;
    };
    let mut fonts = FontDefinitions::default();
    add_fallback_font(&mut fonts, FontData::from_owned(data));
    ctx.set_fonts(fonts);
}

fn add_fallback_font(fonts: &mut FontDefinitions, data: FontData) {
    fonts.font_data.insert(CJK_FONT_NAME.to_string(), data);
    // 絵文字は既定フォントを優先し、日本語のエラーメッセージだけ補う
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(CJK_FONT_NAME.to_string());
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.loading_file || self.state.is_in_flight() {
            ctx.request_repaint();
        }
        self.poll_messages();
        self.process_pending_images(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(RichText::new("Central Asian Cuisine").color(AMBER).strong());
                ui.label(RichText::new("Food Recognition System").color(Color32::from_gray(140)));
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(RichText::new(&self.status).color(Color32::from_gray(150)));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.render_upload(ui);
                    ui.add_space(12.0);
                    match self.state.phase().clone() {
                        Phase::Failed(message) => self.render_error(ui, &message),
                        Phase::Resolved(response) => self.render_results(ui, &response),
                        Phase::Idle | Phase::InFlight { .. } => {}
                    }
                });
        });
    }
}
