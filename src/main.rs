#[cfg(feature = "cli_app")]
mod cli_app {
    use anyhow::{bail, Result};
    use clap::Parser;
    use log::warn;
    use std::io;
    use std::path::PathBuf;
    use vertex_viewer::cli_app::render_report;
    use vertex_viewer::export::save_obj;
    use vertex_viewer::sheet::Spreadsheet;
    use vertex_viewer::zones::group_rows;

    /// Group labeled 3D points from a spreadsheet into zone wireframes.
    #[derive(Parser, Debug)]
    #[command(name = "vertex_viewer", version)]
    struct Args {
        /// Spreadsheet with "Zone name" and "Data points" columns
        /// (.xlsx, .xlsm, .xls, .ods or .csv). Reads CSV from stdin when omitted.
        file: Option<PathBuf>,

        /// Worksheet to read instead of the first one
        #[arg(long)]
        sheet: Option<String>,

        /// Write the renderable wireframes to an OBJ file
        #[arg(long, value_name = "OUT")]
        obj: Option<PathBuf>,

        /// Log debug output
        #[arg(short, long)]
        verbose: bool,
    }

    fn load(args: &Args) -> Result<Spreadsheet> {
        let sheet = match &args.file {
            Some(path) => Spreadsheet::open(path, args.sheet.as_deref())?,
            None => {
                if atty::is(atty::Stream::Stdin) {
                    bail!("no input file given (pass a path, or pipe CSV into stdin)");
                }
                Spreadsheet::from_csv_reader("<stdin>", io::stdin().lock())?
            }
        };
        Ok(sheet)
    }

    pub fn main() -> Result<()> {
        let args = Args::parse();
        let default_level = if args.verbose { "debug" } else { "warn" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

        let sheet = load(&args)?;
        let report = group_rows(&sheet.rows);
        for warning in report.warnings() {
            warn!("{}", warning);
        }

        print!("{}", render_report(&sheet, &report, chrono::Local::now()));

        if let Some(out) = &args.obj {
            let written = save_obj(&report, out)?;
            println!("\nWrote {} wireframe(s) to {}", written, out.display());
        }
        Ok(())
    }
}

#[cfg(feature = "gui_app")]
mod gui_app {
    use eframe::egui;
    use egui::{Color32, RichText};
    use egui_extras::{Column, TableBuilder};
    use egui_plot::{Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};
    use log::{info, warn};
    use std::path::PathBuf;
    use vertex_viewer::sheet::Spreadsheet;
    use vertex_viewer::view::{Bounds, Camera};
    use vertex_viewer::zones::{Zone, ZoneReport};
    use vertex_viewer::{load_report, APP_TITLE};

    const VERTEX_COLOR: Color32 = Color32::from_rgb(250, 90, 90);
    const WIRE_COLOR: Color32 = Color32::from_rgb(100, 143, 255);
    const AXIS_COLORS: [Color32; 3] = [
        Color32::from_rgb(230, 80, 80),
        Color32::from_rgb(90, 200, 90),
        Color32::from_rgb(90, 140, 255),
    ];
    const ORBIT_SPEED: f64 = 0.01;

    enum Loaded {
        Nothing,
        Failed(String),
        Ready {
            sheet: Spreadsheet,
            report: ZoneReport,
            center: [f64; 3],
            extent: f64,
        },
    }

    struct ViewerApp {
        path_input: String,
        sheet_input: String,
        loaded: Loaded,
        camera: Camera,
    }

    impl ViewerApp {
        fn new(cc: &eframe::CreationContext<'_>, initial: Option<PathBuf>) -> Self {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            let mut app = Self {
                path_input: String::new(),
                sheet_input: String::new(),
                loaded: Loaded::Nothing,
                camera: Camera::default(),
            };
            if let Some(path) = initial {
                app.path_input = path.display().to_string();
                app.load(path);
            }
            app
        }

        // One load replaces everything shown before it.
        fn load(&mut self, path: PathBuf) {
            let sheet_name = Some(self.sheet_input.trim()).filter(|s| !s.is_empty());
            self.loaded = match load_report(&path, sheet_name) {
                Ok((sheet, report)) => {
                    for warning in report.warnings() {
                        warn!("{}", warning);
                    }
                    let bounds = Bounds::of(report.renderable().flat_map(|z| z.points.iter()));
                    let center = bounds.map(|b| b.center()).unwrap_or([0.0; 3]);
                    let extent = bounds.map(|b| b.extent()).filter(|e| *e > 0.0).unwrap_or(1.0);
                    info!("{}: {} zones", sheet.source, report.zones.len());
                    Loaded::Ready {
                        sheet,
                        report,
                        center,
                        extent,
                    }
                }
                Err(e) => {
                    warn!("load failed: {}", e);
                    Loaded::Failed(e.to_string())
                }
            };
        }

        fn zone_plot(&mut self, ui: &mut egui::Ui, zone: &Zone, center: [f64; 3], extent: f64) {
            let Some(wire) = zone.wireframe() else {
                return;
            };
            let outline = self.camera.project_all(&wire.polyline(), center);
            let vertices = self.camera.project_all(&wire.vertices, center);
            // plot axes are screen axes, so orientation comes from a world triad
            let triad = self.camera.axis_triad(extent * 0.25);

            let response = Plot::new(format!("zone_plot_{}", zone.name))
                .height(320.0)
                .data_aspect(1.0)
                .allow_drag(false)
                .allow_scroll(false)
                .show_axes(false)
                .legend(Legend::default())
                .show(ui, |plot_ui| {
                    for ((label, tip), color) in triad.into_iter().zip(AXIS_COLORS) {
                        plot_ui.line(Line::new(PlotPoints::new(vec![[0.0, 0.0], tip])).color(color).width(1.5));
                        plot_ui.text(Text::new(PlotPoint::new(tip[0], tip[1]), label).color(color));
                    }
                    plot_ui.line(Line::new(PlotPoints::new(outline)).color(WIRE_COLOR).name("Wireframe"));
                    plot_ui.points(
                        Points::new(PlotPoints::new(vertices))
                            .radius(4.0)
                            .color(VERTEX_COLOR)
                            .name("Vertices"),
                    );
                })
                .response;

            if response.dragged() {
                let d = response.drag_delta();
                self.camera.orbit(d.x as f64 * ORBIT_SPEED, d.y as f64 * ORBIT_SPEED);
            }
            if response.hovered() {
                let scroll = ui.input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    self.camera.zoom_by((scroll as f64 * 0.002).exp());
                }
            }
        }

        fn invalid_table(ui: &mut egui::Ui, report: &ZoneReport) {
            let rows = report.invalid_rows();
            if rows.is_empty() {
                return;
            }
            let extra_headers: Vec<String> = rows[0].extra.iter().map(|(h, _)| h.clone()).collect();

            ui.separator();
            ui.heading(format!("Invalid rows ({})", rows.len()));
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .column(Column::auto().at_least(40.0))
                .column(Column::auto().at_least(140.0))
                .column(Column::auto().at_least(140.0))
                .column(Column::auto().at_least(160.0))
                .columns(Column::auto().at_least(80.0), extra_headers.len())
                .header(20.0, |mut header| {
                    for title in ["Row", "Zone name", "Data points", "Reason"] {
                        header.col(|ui| {
                            ui.strong(title);
                        });
                    }
                    for title in &extra_headers {
                        header.col(|ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|mut body| {
                    for row in rows {
                        body.row(18.0, |mut table_row| {
                            table_row.col(|ui| {
                                ui.label(row.line.to_string());
                            });
                            table_row.col(|ui| {
                                ui.label(&row.zone_label);
                            });
                            table_row.col(|ui| {
                                ui.monospace(&row.raw_point);
                            });
                            table_row.col(|ui| {
                                ui.label(row.reason.to_string());
                            });
                            for (_, value) in &row.extra {
                                table_row.col(|ui| {
                                    ui.label(value);
                                });
                            }
                        });
                    }
                });
        }
    }

    impl eframe::App for ViewerApp {
        fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
            let dropped = ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone()));
            if let Some(path) = dropped {
                self.path_input = path.display().to_string();
                self.load(path);
            }

            egui::TopBottomPanel::top("load_panel").show(ctx, |ui| {
                ui.heading(APP_TITLE);
                ui.label("1. Load a spreadsheet with \"Zone name\" and \"Data points\" columns (or drop it on the window).");
                ui.label("2. View the generated 3D wireframe for each zone.");
                ui.label("3. Drag a plot to rotate, scroll to zoom.");
                ui.horizontal(|ui| {
                    ui.label("File:");
                    let edit = ui.text_edit_singleline(&mut self.path_input);
                    ui.label("Worksheet:");
                    ui.add(egui::TextEdit::singleline(&mut self.sheet_input).desired_width(100.0));
                    let enter = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if (ui.button("Load").clicked() || enter) && !self.path_input.trim().is_empty() {
                        let path = PathBuf::from(self.path_input.trim());
                        self.load(path);
                    }
                });
                ui.horizontal(|ui| {
                    ui.add(egui::Slider::new(&mut self.camera.yaw, -std::f64::consts::PI..=std::f64::consts::PI).text("yaw"));
                    ui.add(
                        egui::Slider::new(&mut self.camera.pitch, -std::f64::consts::FRAC_PI_2..=std::f64::consts::FRAC_PI_2)
                            .text("pitch"),
                    );
                    if ui.button("Reset view").clicked() {
                        self.camera.reset();
                    }
                });
            });

            let loaded = std::mem::replace(&mut self.loaded, Loaded::Nothing);
            egui::CentralPanel::default().show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| match &loaded {
                    Loaded::Nothing => {
                        ui.label("No file loaded.");
                    }
                    Loaded::Failed(msg) => {
                        ui.colored_label(Color32::LIGHT_RED, msg);
                    }
                    Loaded::Ready {
                        sheet,
                        report,
                        center,
                        extent,
                    } => {
                        ui.colored_label(
                            Color32::LIGHT_GREEN,
                            format!("File uploaded successfully! {} rows from {}", sheet.rows.len(), sheet.source),
                        );
                        for zone in report.zones.values() {
                            ui.separator();
                            ui.heading(format!("Zone: {}", zone.name));
                            match zone.warning() {
                                Some(warning) => {
                                    ui.colored_label(Color32::YELLOW, warning.to_string());
                                }
                                None => self.zone_plot(ui, zone, *center, *extent),
                            }
                            if zone.invalid_count() > 0 {
                                ui.label(RichText::new(format!("{} invalid row(s)", zone.invalid_count())).weak());
                            }
                        }
                        ViewerApp::invalid_table(ui, report);
                        if !report.unmatched.is_empty() {
                            ui.label(format!(
                                "{} row(s) without a '<name> Vertex' label skipped",
                                report.unmatched.len()
                            ));
                        }
                    }
                });
            });
            self.loaded = loaded;
        }
    }

    pub fn main() -> Result<(), eframe::Error> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let initial = std::env::args().nth(1).map(PathBuf::from);

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size([1024.0, 768.0]),
            ..Default::default()
        };

        eframe::run_native(
            APP_TITLE,
            options,
            Box::new(move |cc| Box::new(ViewerApp::new(cc, initial))),
        )
    }
}

fn main() {
    #[cfg(all(feature = "cli_app", feature = "gui_app"))]
    compile_error!("Features 'cli_app' and 'gui_app' are mutually exclusive. Please enable only one.");

    #[cfg(feature = "cli_app")]
    {
        // each error's message already carries its cause
        if let Err(e) = cli_app::main() {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    #[cfg(feature = "gui_app")]
    {
        if let Err(e) = gui_app::main() {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    #[cfg(not(any(feature = "cli_app", feature = "gui_app")))]
    {
        eprintln!("Error: No application feature ('cli_app' or 'gui_app') enabled.");
        eprintln!("Build with --features cli_app or --no-default-features --features gui_app");
        std::process::exit(1);
    }
}
