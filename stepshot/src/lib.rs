//! Action recorder with illustrated session reports
//!
//! This crate listens for mouse and keyboard input system-wide, captures a
//! screenshot on each relevant event, annotates the click location with a
//! locator ring, and assembles a chronological, illustrated report in three
//! formats (Markdown, HTML, and optionally DOCX).
//!
//! The core is the event-to-record pipeline: concurrent capture of OS-level
//! input events, correlation with a synchronously-captured screen image and
//! active-window metadata, construction of an ordered thread-safe step
//! ledger, and deterministic rendering of that ledger into report artifacts.

pub mod annotate;
pub mod capture;
pub mod error;
pub mod ledger;
pub mod listener;
pub mod pipeline;
pub mod recorder;
pub mod report;
pub mod session;
pub mod step;
pub mod window;

pub use annotate::Annotator;
pub use capture::{CaptureProvider, CaptureRegion, ScreenCapture};
pub use error::{RecorderError, Result};
pub use ledger::{LedgerGuard, StepLedger};
pub use listener::{InputListeners, MANUAL_CAPTURE_KEY, TERMINATE_KEY};
pub use pipeline::StepPipeline;
pub use recorder::{ActionRecorder, CROP_RADIUS};
pub use report::{renderers, DocxRenderer, HtmlRenderer, MarkdownRenderer, ReportRenderer};
pub use session::{Session, SessionPhase};
pub use step::{PointerButton, Position, Step, StepAction};
pub use window::{create_inspector, ActiveWindow, GenericInspector, WindowInspector};

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn make_step(index: u64, action: StepAction, position: Option<Position>) -> Step {
        Step {
            index,
            timestamp: "2026-08-28 10:00:00".to_string(),
            action,
            position,
            window_title: "Notepad".to_string(),
            app_name: "notepad.exe".to_string(),
            image_ref: format!("images/step_{}.png", index),
            marked_image_ref: format!("images_marked/step_{}.png", index),
        }
    }

    #[test]
    fn test_position_copy_trait() {
        let pos1 = Position { x: 100, y: 200 };
        let pos2 = pos1;
        assert_eq!(pos1.x, pos2.x);
        assert_eq!(pos1.y, pos2.y);
        assert_eq!(pos1.to_string(), "(100, 200)");
    }

    #[test]
    fn test_pointer_button_tokens() {
        assert_eq!(PointerButton::Left.to_string(), "left");
        assert_eq!(PointerButton::Right.to_string(), "right");
        assert_eq!(PointerButton::Middle.to_string(), "middle");
        assert_eq!(PointerButton::Other(7).to_string(), "button7");
    }

    #[test]
    fn test_action_descriptions() {
        let click = StepAction::Click {
            button: PointerButton::Left,
        };
        assert_eq!(click.to_string(), "click:left");
        assert!(click.is_click());

        let scroll = StepAction::Scroll { dx: 0, dy: -3 };
        assert_eq!(scroll.to_string(), "scroll:0,-3");
        assert!(!scroll.is_click());

        assert_eq!(StepAction::ManualScreenshot.to_string(), "manual-screenshot");
    }

    #[test]
    fn test_step_serialization_round_trip() {
        let step = make_step(
            1,
            StepAction::Click {
                button: PointerButton::Left,
            },
            Some(Position { x: 100, y: 200 }),
        );
        let json = serde_json::to_string(&step).expect("serialize step");
        assert!(json.contains("Click"));
        let back: Step = serde_json::from_str(&json).expect("deserialize step");
        assert_eq!(back.index, 1);
        assert_eq!(back.position, Some(Position { x: 100, y: 200 }));
        assert_eq!(back.window_title, "Notepad");
    }

    #[test]
    fn test_ledger_indices_are_contiguous_under_concurrent_appends() {
        let ledger = Arc::new(StepLedger::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let ledger = Arc::clone(&ledger);
            handles.push(std::thread::spawn(move || {
                for _ in 0..25 {
                    let guard = ledger.begin_step().expect("begin step");
                    let index = guard.next_index();
                    guard.commit(make_step(index, StepAction::ManualScreenshot, None));
                }
            }));
        }
        for handle in handles {
            handle.join().expect("appender thread");
        }

        let steps = ledger.snapshot().expect("snapshot");
        assert_eq!(steps.len(), 100);
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.index, i as u64 + 1);
        }
    }

    #[test]
    fn test_ledger_abandoned_guard_consumes_no_index() {
        let ledger = StepLedger::new();
        {
            let guard = ledger.begin_step().expect("begin step");
            assert_eq!(guard.next_index(), 1);
            // Dropped without commit: the capture-error path
        }
        let guard = ledger.begin_step().expect("begin step");
        assert_eq!(guard.next_index(), 1);
        guard.commit(make_step(1, StepAction::ManualScreenshot, None));
        assert_eq!(ledger.len().expect("len"), 1);
    }

    #[test]
    fn test_session_phase_transitions() {
        let dir = tempdir().expect("tempdir");
        let session = Session::create(dir.path()).expect("session");
        assert_eq!(session.phase(), SessionPhase::Idle);

        // Skipping Listening is not allowed
        assert!(session.advance(SessionPhase::Rendering).is_err());
        session.advance(SessionPhase::Listening).expect("to listening");
        assert!(session.advance(SessionPhase::Done).is_err());
        session.advance(SessionPhase::Rendering).expect("to rendering");
        session.advance(SessionPhase::Done).expect("to done");
        assert!(session.advance(SessionPhase::Listening).is_err());
    }

    #[test]
    fn test_session_directory_layout() {
        let dir = tempdir().expect("tempdir");
        let session = Session::create_with_run_id(dir.path(), "20260828_100000".to_string())
            .expect("session");
        assert_eq!(session.run_id(), "20260828_100000");
        assert!(session
            .base_dir()
            .ends_with("recording_20260828_100000"));
        assert!(session.images_dir().is_dir());
        assert!(session.marked_images_dir().is_dir());
    }

    #[test]
    fn test_next_image_path_avoids_collisions() {
        let dir = tempdir().expect("tempdir");
        let session = Session::create(dir.path()).expect("session");
        let first = session.next_image_path("step");
        std::fs::write(&first, b"x").expect("write placeholder");
        let second = session.next_image_path("step");
        assert_ne!(first, second);
        assert!(second
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with("step_") && n.ends_with(".png"))
            .unwrap_or(false));
    }

    #[test]
    fn test_capture_region_around_clamps_origin() {
        let region = CaptureRegion::around(Position { x: 10, y: 5 }, 220);
        assert_eq!(region.left, 0);
        assert_eq!(region.top, 0);
        assert_eq!(region.width, 440);
        assert_eq!(region.height, 440);

        let region = CaptureRegion::around(Position { x: 500, y: 400 }, 100);
        assert_eq!(region.left, 400);
        assert_eq!(region.top, 300);
    }

    #[test]
    fn test_annotate_preserves_dimensions_and_marks_ring() {
        let dir = tempdir().expect("tempdir");
        let source = RgbaImage::from_pixel(200, 150, image::Rgba([10, 20, 30, 255]));
        let target = dir.path().join("marked.png");

        Annotator::new()
            .annotate(&source, &target, Some(Position { x: 100, y: 75 }))
            .expect("annotate");

        let marked = image::open(&target).expect("open marked").to_rgb8();
        assert_eq!(marked.width(), 200);
        assert_eq!(marked.height(), 150);

        // Pixels outside the ring bounding box are untouched
        assert_eq!(marked.get_pixel(0, 0).0, [10, 20, 30]);
        // The ring stroke itself is the saturated red
        assert_eq!(marked.get_pixel(100 + 18, 75).0, [220, 40, 40]);
        // The ring center is untouched
        assert_eq!(marked.get_pixel(100, 75).0, [10, 20, 30]);
    }

    #[test]
    fn test_annotate_without_point_is_a_plain_copy() {
        let dir = tempdir().expect("tempdir");
        let source = RgbaImage::from_pixel(40, 30, image::Rgba([200, 100, 50, 255]));
        let target = dir.path().join("copy.png");

        Annotator::new()
            .annotate(&source, &target, None)
            .expect("annotate");

        let copy = image::open(&target).expect("open copy").to_rgb8();
        assert_eq!((copy.width(), copy.height()), (40, 30));
        assert!(copy.pixels().all(|p| p.0 == [200, 100, 50]));
    }

    #[test]
    fn test_annotate_off_image_point_still_saves() {
        let dir = tempdir().expect("tempdir");
        let source = RgbaImage::from_pixel(50, 50, image::Rgba([0, 0, 0, 255]));
        let target = dir.path().join("edge.png");

        Annotator::new()
            .annotate(&source, &target, Some(Position { x: -500, y: -500 }))
            .expect("annotate");
        assert!(target.exists());
    }

    #[test]
    fn test_markdown_renderer_is_deterministic() {
        let dir = tempdir().expect("tempdir");
        let session = Session::create(dir.path()).expect("session");
        let steps = vec![
            make_step(
                1,
                StepAction::Click {
                    button: PointerButton::Left,
                },
                Some(Position { x: 100, y: 200 }),
            ),
            make_step(2, StepAction::Scroll { dx: 0, dy: -3 }, Some(Position { x: 50, y: 50 })),
        ];

        let path = MarkdownRenderer.render(&session, &steps).expect("render");
        let first = std::fs::read_to_string(&path).expect("read report");
        MarkdownRenderer.render(&session, &steps).expect("render again");
        let second = std::fs::read_to_string(&path).expect("read report");
        assert_eq!(first, second);

        assert!(first.contains("## Step 1"));
        assert!(first.contains("**Action:** click:left at (100, 200)"));
        assert!(first.contains("**Action:** scroll:0,-3"));
        assert!(first.contains("![screenshot](images_marked/step_1.png)"));
        assert!(first.contains("(app: `notepad.exe`)"));
    }

    #[test]
    fn test_markdown_renderer_omits_empty_window_bullet() {
        let dir = tempdir().expect("tempdir");
        let session = Session::create(dir.path()).expect("session");
        let mut step = make_step(1, StepAction::ManualScreenshot, None);
        step.window_title = String::new();
        step.app_name = String::new();

        let path = MarkdownRenderer.render(&session, &[step]).expect("render");
        let report = std::fs::read_to_string(path).expect("read report");
        assert!(!report.contains("**Window:**"));
        assert!(!report.contains("(app:"));
    }

    #[test]
    fn test_html_renderer_escapes_and_anchors() {
        let dir = tempdir().expect("tempdir");
        let session = Session::create(dir.path()).expect("session");
        let mut step = make_step(
            1,
            StepAction::Click {
                button: PointerButton::Right,
            },
            Some(Position { x: 5, y: 6 }),
        );
        step.window_title = "<script>alert(1)</script> & more".to_string();

        let path = HtmlRenderer.render(&session, &[step]).expect("render");
        let html = std::fs::read_to_string(path).expect("read report");
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; more"));
        assert!(html.contains(r##"href="#step-1""##));
        assert!(html.contains(r#"<div class="card" id="step-1">"#));
        assert!(html.contains("click:right at (5, 6)"));
        assert!(html.contains("1 step(s)"));
    }

    #[test]
    fn test_html_renderer_idempotent_modulo_generated_at() {
        let dir = tempdir().expect("tempdir");
        let session = Session::create(dir.path()).expect("session");
        let steps = vec![make_step(1, StepAction::ManualScreenshot, None)];

        let strip_footer = |html: &str| -> String {
            html.lines()
                .filter(|l| !l.contains("Report generated at"))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let path = HtmlRenderer.render(&session, &steps).expect("render");
        let first = strip_footer(&std::fs::read_to_string(&path).expect("read"));
        HtmlRenderer.render(&session, &steps).expect("render again");
        let second = strip_footer(&std::fs::read_to_string(&path).expect("read"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_renderer_list_and_availability() {
        let all = renderers();
        let names: Vec<_> = all.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["markdown", "html", "docx"]);
        assert!(MarkdownRenderer.is_available());
        assert!(HtmlRenderer.is_available());
        assert_eq!(DocxRenderer.is_available(), cfg!(feature = "docx"));
    }

    #[test]
    fn test_error_display() {
        let capture = RecorderError::Capture("display unreadable".to_string());
        assert!(capture.to_string().contains("display unreadable"));
        let phase = RecorderError::InvalidPhase("Idle -> Done".to_string());
        assert!(phase.to_string().contains("Idle -> Done"));
    }

    #[test]
    fn test_active_window_defaults_to_empty() {
        let window = ActiveWindow::default();
        assert!(window.title.is_empty());
        assert!(window.app_name.is_empty());
    }
}
