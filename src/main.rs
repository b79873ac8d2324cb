//! bboxee-replay: headless editor host
//!
//! Replays a scripted pointer session against an image and its annotations,
//! applies the resulting editor events to an in-memory store and prints them.
//!
//! ```text
//! bboxee-replay <image> <annotations.json> <session.json> [--config <path>] [--details]
//! ```
//!
//! A session is a JSON list of steps:
//!
//! ```json
//! [
//!   { "step": "viewport_size", "width": 1280, "height": 720 },
//!   { "step": "pointer", "event": { "type": "down", "position": { "x": 10, "y": 10 }, "button": "primary" } },
//!   { "step": "pointer", "event": { "type": "move", "position": { "x": 90, "y": 70 } } },
//!   { "step": "pointer", "event": { "type": "up", "position": { "x": 90, "y": 70 } } },
//!   { "step": "zoom_in" }
//! ]
//! ```
//!
//! A `viewport_size` step fits the image to the new size unless the view has
//! already been zoomed or panned; `fit_to_view` refits unconditionally.

#[cfg(not(target_arch = "wasm32"))]
mod replay {
    use std::path::{Path, PathBuf};

    use bboxee::{
        AnnotationStore, ConfigError, Editor, EditorConfig, EditorError, EditorEvent,
        PointerEvent,
    };
    use serde::Deserialize;

    /// Name stamped into `updated_by` for edits made during a replay.
    const REPLAY_USER: &str = "replay";

    #[derive(Debug, thiserror::Error)]
    pub enum ReplayError {
        #[error("Usage: bboxee-replay <image> <annotations.json> <session.json> [--config <path>] [--details]")]
        Usage,

        #[error("Failed to read {path}: {source}")]
        Io {
            path: PathBuf,
            source: std::io::Error,
        },

        #[error("Failed to decode image: {0}")]
        Image(#[from] image::ImageError),

        #[error("Invalid JSON in {path}: {source}")]
        Json {
            path: PathBuf,
            source: serde_json::Error,
        },

        #[error("Failed to write output: {0}")]
        Output(#[from] serde_json::Error),

        #[error(transparent)]
        Config(#[from] ConfigError),

        #[error(transparent)]
        Editor(#[from] EditorError),
    }

    /// One scripted action.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(tag = "step", rename_all = "snake_case")]
    enum Step {
        ViewportSize { width: f64, height: f64 },
        Pointer { event: PointerEvent },
        ZoomIn,
        ZoomOut,
        FitToView,
        ToggleVisibility,
    }

    struct Args {
        image: PathBuf,
        annotations: PathBuf,
        session: PathBuf,
        config: Option<PathBuf>,
        details: bool,
    }

    fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, ReplayError> {
        let mut positional = Vec::new();
        let mut config = None;
        let mut details = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => config = Some(args.next().ok_or(ReplayError::Usage)?.into()),
                "--details" => details = true,
                _ => positional.push(PathBuf::from(arg)),
            }
        }

        let [image, annotations, session]: [PathBuf; 3] =
            positional.try_into().map_err(|_| ReplayError::Usage)?;
        Ok(Args {
            image,
            annotations,
            session,
            config,
            details,
        })
    }

    fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ReplayError> {
        let text = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ReplayError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    fn load_config(path: Option<&Path>) -> Result<EditorConfig, ReplayError> {
        match path {
            Some(path) => Ok(EditorConfig::load_from_path(path)?),
            None => Ok(EditorConfig::load_from_default_path().unwrap_or_default()),
        }
    }

    fn init_logging(config: &EditorConfig) {
        env_logger::Builder::new()
            .filter_level(config.log_level.to_level_filter())
            .parse_default_env()
            .init();
    }

    pub fn run() -> Result<(), ReplayError> {
        let args = parse_args(std::env::args().skip(1))?;
        let config = load_config(args.config.as_deref())?;
        init_logging(&config);

        let decoded = image::open(&args.image)?.to_rgba8();
        let (width, height) = decoded.dimensions();

        let mut store = AnnotationStore::with_annotations(REPLAY_USER, read_json(&args.annotations)?);
        let steps: Vec<Step> = read_json(&args.session)?;
        log::info!(
            "▶️ Replaying {} steps over {} annotations",
            steps.len(),
            store.len()
        );

        let mut editor = Editor::new(config);
        editor.load_image(decoded.into_raw(), width, height, 4)?;
        editor.display(store.annotations(), store.selected(), args.details);

        let mut events: Vec<EditorEvent> = Vec::new();
        for step in steps {
            match step {
                Step::ViewportSize { width, height } => editor.set_viewport_size(width, height),
                Step::Pointer { event } => editor.handle(event, &mut events),
                Step::ZoomIn => {
                    editor.zoom_in(&mut events);
                }
                Step::ZoomOut => {
                    editor.zoom_out(&mut events);
                }
                Step::FitToView => editor.fit_to_view(),
                Step::ToggleVisibility => {
                    editor.toggle_visibility();
                }
            }

            for event in events.drain(..) {
                println!("{}", serde_json::to_string(&event)?);
                if store.apply(&event) {
                    editor.display(store.annotations(), store.selected(), args.details);
                }
            }
        }

        println!("{}", store.to_json()?);
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(list: &[&str]) -> impl Iterator<Item = String> {
            list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
        }

        #[test]
        fn test_parse_args() {
            let parsed = parse_args(args(&["a.png", "--details", "b.json", "c.json"])).unwrap();
            assert_eq!(parsed.image, PathBuf::from("a.png"));
            assert_eq!(parsed.session, PathBuf::from("c.json"));
            assert!(parsed.details);
            assert!(parsed.config.is_none());

            let parsed =
                parse_args(args(&["a.png", "b.json", "c.json", "--config", "x.json"])).unwrap();
            assert_eq!(parsed.config, Some(PathBuf::from("x.json")));
        }

        #[test]
        fn test_parse_args_rejects_missing_paths() {
            assert!(matches!(
                parse_args(args(&["a.png", "b.json"])),
                Err(ReplayError::Usage)
            ));
            assert!(matches!(
                parse_args(args(&["a.png", "b.json", "c.json", "--config"])),
                Err(ReplayError::Usage)
            ));
        }

        #[test]
        fn test_session_steps_parse() {
            let json = r#"[
                { "step": "viewport_size", "width": 800, "height": 600 },
                { "step": "pointer", "event": { "type": "down", "position": { "x": 1, "y": 2 }, "button": "middle" } },
                { "step": "pointer", "event": { "type": "wheel", "delta": -1, "position": { "x": 0, "y": 0 } } },
                { "step": "fit_to_view" },
                { "step": "toggle_visibility" }
            ]"#;
            let steps: Vec<Step> = serde_json::from_str(json).unwrap();
            assert_eq!(steps.len(), 5);
            assert!(matches!(steps[1], Step::Pointer { event: PointerEvent::Down { .. } }));
            assert!(matches!(steps[3], Step::FitToView));
        }
    }
}

/// Main entry point for native builds
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = replay::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// The replay host needs a filesystem
#[cfg(target_arch = "wasm32")]
fn main() {}
