// crates/clipper-ui/src/app.rs
use clipper_core::commands::EditorCommand;
use clipper_core::config::{Settings, SETTINGS_KEY};
use clipper_core::state::{commits_text_first, AppState, ExportStatus, StatusKind};
use clipper_media::MediaWorker;
use crate::context::AppContext;
use crate::theme::{configure_style, ACCENT};
use crate::modules::{
    EditorModule,
    file_module::FileModule,
    selection_module::SelectionModule,
    export_module::ExportModule,
    preview_module::PreviewModule,
};
use eframe::egui;
use rfd::FileDialog;
use std::path::PathBuf;
use std::time::Duration;

/// Extensions offered by the open dialog. Anything else is still accepted
/// through "All files", drag-and-drop or the path field; the probe decides.
const MEDIA_EXTENSIONS: &[&str] = &["mp4", "wmv", "avi", "mov", "mkv", "mp3", "aac", "wav", "flac"];

/// Repaint cadence while something in the background is producing results.
const POLL_INTERVAL: Duration = Duration::from_millis(15);

// ── App ───────────────────────────────────────────────────────────────────────

pub struct ClipperApp {
    state:        AppState,
    context:      AppContext,
    /// What gets persisted. Environment overrides never land here.
    settings:     Settings,
    /// Effective engine and output directory after environment overrides.
    engine:       PathBuf,
    output_dir:   PathBuf,
    // Panels as concrete types: a typo is a compile error, not a blank panel.
    file:         FileModule,
    selection:    SelectionModule,
    export:       ExportModule,
    preview:      PreviewModule,
    /// Commands emitted by panels each frame, processed after the UI pass.
    pending_cmds: Vec<EditorCommand>,
}

impl ClipperApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        configure_style(&cc.egui_ctx);

        let settings: Settings = cc.storage
            .and_then(|s| eframe::get_value(s, SETTINGS_KEY))
            .unwrap_or_default();
        let effective = settings.clone().with_env_overrides();
        tracing::info!(
            engine = %effective.engine.display(),
            output_dir = %effective.output_dir.display(),
            "settings loaded"
        );

        let state = AppState {
            output_name:   settings.last_output_name.clone(),
            output_format: settings.default_format,
            ..AppState::default()
        };

        Self {
            state,
            context:      AppContext::new(MediaWorker::new()),
            settings,
            engine:       effective.engine,
            output_dir:   effective.output_dir,
            file:         FileModule::default(),
            selection:    SelectionModule::default(),
            export:       ExportModule::default(),
            preview:      PreviewModule::default(),
            pending_cmds: Vec::new(),
        }
    }

    fn process_command(&mut self, cmd: EditorCommand) {
        // What the entries show is what gets cut or previewed.
        if commits_text_first(&cmd) {
            if let Err(e) = self.state.flush_draft() {
                self.state.set_error(&e);
                return;
            }
        }

        match cmd {
            // ── File ─────────────────────────────────────────────────────────
            EditorCommand::BrowseForFile => {
                let picked = FileDialog::new()
                    .set_title("Select a media file")
                    .add_filter("Media files", MEDIA_EXTENSIONS)
                    .add_filter("All files", &["*"])
                    .pick_file();
                if let Some(path) = picked {
                    self.process_command(EditorCommand::SelectFile(path));
                }
            }
            EditorCommand::SelectFile(path) => {
                tracing::info!("probing {}", path.display());
                let request = self.context.media_worker.probe_file(path.clone());
                self.state.begin_probe(request, path);
            }

            // ── Selection ────────────────────────────────────────────────────
            EditorCommand::EditTimeText { start, end } => {
                self.state.edit_text(start, end);
            }
            EditorCommand::CommitTimeText { start, end } => {
                match self.state.commit_text(&start, &end) {
                    Ok(iv) => {
                        tracing::debug!(start = iv.start, end = iv.end, "interval from text");
                        self.clear_error_status();
                    }
                    Err(e) => self.state.set_error(&e),
                }
            }
            EditorCommand::DragBegin { x, width } => {
                self.state.drag_begin(x, width);
            }
            EditorCommand::DragMove { x, width } => {
                self.state.drag_move(x, width);
            }
            EditorCommand::DragEnd { x, width } => {
                if let Some(iv) = self.state.drag_end(x, width) {
                    tracing::debug!(start = iv.start, end = iv.end, "interval from drag");
                    self.clear_error_status();
                }
            }

            // ── Export ───────────────────────────────────────────────────────
            EditorCommand::SetOutputName(name) => {
                self.settings.last_output_name = name.clone();
                self.state.output_name = name;
            }
            EditorCommand::SetOutputFormat(format) => {
                self.settings.default_format = format;
                self.state.output_format = format;
            }
            EditorCommand::StartExport => {
                if self.state.export.is_running() {
                    tracing::warn!("export already running, request ignored");
                    return;
                }
                match self.state.export_request(self.output_dir.clone()) {
                    Ok(req) => {
                        tracing::info!(
                            "export {:.3}s..{:.3}s → {}",
                            req.interval().start,
                            req.interval().end,
                            req.output_path().display(),
                        );
                        let job_id = self.context.media_worker.start_export(req, self.engine.clone());
                        self.state.export_started(job_id);
                    }
                    Err(e) => self.state.set_error(&e),
                }
            }
            EditorCommand::ClearExportStatus => {
                if !self.state.export.is_running() {
                    self.state.export = ExportStatus::Idle;
                }
            }

            // ── Preview ──────────────────────────────────────────────────────
            EditorCommand::OpenPreview => {
                match self.state.preview_target() {
                    Ok((media, interval)) => {
                        self.context.clear_preview();
                        let session = self.context.media_worker
                            .open_preview(media.path.clone(), interval);
                        self.state.preview_started(session, &media, interval);
                    }
                    Err(e) => self.state.set_error(&e),
                }
            }
            EditorCommand::TogglePreviewPlay => {
                if let Some(view) = self.state.preview.as_mut() {
                    view.playing = !view.playing;
                    self.context.media_worker.toggle_preview();
                }
            }
            EditorCommand::RestartPreview => {
                if let Some(view) = self.state.preview.as_mut() {
                    view.playing  = true;
                    view.playhead = view.interval.start;
                    self.context.media_worker.restart_preview();
                }
            }
            EditorCommand::SeekPreview(fraction) => {
                if let Some(view) = self.state.preview.as_mut() {
                    view.playhead = view.interval.at_fraction(fraction);
                    self.context.media_worker.seek_preview(fraction);
                }
            }
            EditorCommand::ClosePreview => {
                if self.state.preview.take().is_some() {
                    self.context.media_worker.close_preview();
                    self.context.clear_preview();
                }
            }

            // ── View ─────────────────────────────────────────────────────────
            EditorCommand::ClearStatus => {
                self.state.status = None;
            }
        }
    }

    /// A successful edit supersedes an earlier complaint about the interval.
    fn clear_error_status(&mut self) {
        if matches!(&self.state.status, Some(s) if s.kind == StatusKind::Error) {
            self.state.status = None;
        }
    }

    fn poll_media(&mut self, ctx: &egui::Context) {
        self.context.poll_preview_frames(&mut self.state, ctx);
        self.context.ingest_media_results(&mut self.state, ctx);
    }

    fn handle_drag_and_drop(&mut self, ctx: &egui::Context) {
        let first = ctx.input(|i| {
            i.raw.dropped_files.iter().find_map(|f| f.path.clone())
        });
        if let Some(path) = first {
            self.pending_cmds.push(EditorCommand::SelectFile(path));
        }
    }

    fn busy(&self) -> bool {
        self.state.export.is_running()
            || self.state.preview.is_some()
            || self.state.pending_probe.is_some()
    }

    fn show_preview_window(&mut self, ctx: &egui::Context) {
        let Some(view) = &self.state.preview else { return };

        self.preview.current_frame = self.context.preview_texture.clone();
        let title = view.title.clone();

        let state   = &self.state;
        let preview = &mut self.preview;
        let cmds    = &mut self.pending_cmds;

        ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("clipper_preview"),
            egui::ViewportBuilder::default()
                .with_title(&title)
                .with_inner_size([640.0, 440.0])
                .with_min_inner_size([320.0, 240.0]),
            |ctx, class| {
                if class == egui::ViewportClass::Embedded {
                    // Backend without multi-viewport support: fall back to a window.
                    let mut open = true;
                    egui::Window::new(&title)
                        .id(egui::Id::new(preview.name()))
                        .open(&mut open)
                        .default_size([640.0, 440.0])
                        .show(ctx, |ui| preview.ui(ui, state, cmds));
                    if !open {
                        cmds.push(EditorCommand::ClosePreview);
                    }
                    return;
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    preview.ui(ui, state, cmds);
                });
                if ctx.input(|i| i.viewport().close_requested()) {
                    cmds.push(EditorCommand::ClosePreview);
                }
            },
        );
    }
}

// ── eframe::App ───────────────────────────────────────────────────────────────

impl eframe::App for ClipperApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, SETTINGS_KEY, &self.settings);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if self.state.preview.is_some() {
            self.context.media_worker.close_preview();
        }
        self.context.media_worker.shutdown();
        tracing::info!("shutting down");
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_drag_and_drop(ctx);
        self.poll_media(ctx);

        egui::TopBottomPanel::top("top_panel")
            .exact_height(36.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new("✂ Clipper")
                            .strong().size(15.0).color(ACCENT),
                    );
                    ui.separator();
                    ui.label(egui::RichText::new("Drop a media file to open it").size(12.0).weak());
                });
            });

        egui::TopBottomPanel::bottom("export_panel")
            .resizable(false)
            .min_height(150.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                self.export.ui(ui, &self.state, &mut self.pending_cmds);
                ui.add_space(6.0);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.file.ui(ui, &self.state, &mut self.pending_cmds);
            ui.add_space(10.0);
            self.selection.ui(ui, &self.state, &mut self.pending_cmds);
        });

        self.show_preview_window(ctx);

        // ── Process commands emitted by panels this frame ─────────────────────
        let cmds: Vec<EditorCommand> = self.pending_cmds.drain(..).collect();
        for cmd in cmds {
            tracing::trace!(panel_cmd = ?cmd, "command");
            self.process_command(cmd);
        }

        if self.busy() {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}
