//! Rendering tests through a vt100 virtual terminal.

mod vt100_backend;

use std::time::{Duration, Instant};

use preloader_core::{PreloadPlan, Preloader};
use preloader_tui::{Landing, PreloadDisplay, draw};
use preloader_types::ui::UiOptions;
use preloader_types::{
    DwellPolicy, ExitTimings, ProgressWeights, SettleOutcome, Settlement, WordPlaylist,
};
use ratatui::Terminal;

use vt100_backend::VT100Backend;

const WIDTH: u16 = 60;
const HEIGHT: u16 = 20;
const BASELINE: u16 = HEIGHT / 2;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn started(words: &[&str], assets: usize, at: Instant) -> Preloader {
    let plan = PreloadPlan {
        playlist: WordPlaylist::new(words.iter().copied()).unwrap(),
        asset_count: assets,
        dwell: DwellPolicy::default(),
        exit: ExitTimings::default(),
        weights: ProgressWeights::default(),
    };
    let mut preloader = Preloader::new(plan, at);
    preloader.start(at);
    preloader
}

fn render(preloader: &Preloader, now: Instant, options: UiOptions) -> Terminal<VT100Backend> {
    let mut display = PreloadDisplay::new(options);
    display.update(preloader.progress(), now);
    let landing = Landing::new("Welcome", &preloader.report());
    let view = preloader.view(now);

    let mut terminal = Terminal::new(VT100Backend::new(WIDTH, HEIGHT)).unwrap();
    terminal
        .draw(|frame| draw(frame, &view, &display, &landing))
        .unwrap();
    terminal
}

#[test]
fn settled_word_sits_on_the_baseline() {
    let t0 = Instant::now();
    let preloader = started(&["HELLO", "BONJOUR", "WELCOME"], 3, t0);
    let terminal = render(&preloader, t0 + ms(500), UiOptions::default());
    let screen = terminal.backend();

    assert_eq!(screen.find_row("HELLO"), Some(BASELINE));
    let row = screen.row(BASELINE);
    let column = row.find("HELLO").unwrap();
    // Centered within a column or so.
    assert!((column as i32 - (i32::from(WIDTH) - 5) / 2).abs() <= 1, "{row:?}");

    assert!(screen.row(HEIGHT - 2).ends_with("01 / 03"));
    assert!(screen.contents().contains("○ LOADING"));
}

#[test]
fn wide_graphemes_render_intact() {
    let t0 = Instant::now();
    let preloader = started(&["你好", "WELCOME"], 1, t0);
    let terminal = render(&preloader, t0 + ms(500), UiOptions::default());

    assert_eq!(terminal.backend().find_row("你好"), Some(BASELINE));
}

#[test]
fn leaving_word_lifts_off_the_baseline() {
    let t0 = Instant::now();
    let preloader = started(&["HELLO", "WELCOME"], 1, t0);
    // First dwell is 600ms, then a 200ms leave.
    let terminal = render(&preloader, t0 + ms(790), UiOptions::default());
    let screen = terminal.backend();

    assert!(!screen.row(BASELINE).contains('H'));
    let lifted = screen.row(BASELINE - 2);
    assert!(lifted.contains('L') || lifted.contains('O'), "{lifted:?}");
}

#[test]
fn ready_status_shows_full_percentage() {
    let t0 = Instant::now();
    let mut preloader = started(&["WELCOME"], 1, t0);
    preloader.settle(
        Settlement {
            slot: 0,
            outcome: SettleOutcome::failed("HTTP 404"),
        },
        t0 + ms(20),
    );
    let terminal = render(&preloader, t0 + ms(40), UiOptions::default());
    let contents = terminal.backend().contents();

    assert!(contents.contains("● READY"), "{contents}");
    assert!(contents.contains("100%"), "{contents}");
    assert!(contents.contains("WELCOME"), "{contents}");
}

#[test]
fn parting_curtains_reveal_the_landing() {
    let t0 = Instant::now();
    let preloader = started(&["WELCOME"], 0, t0);
    assert!(preloader.is_ready());

    // Curtains start at 1120ms and run 800ms.
    let closed = render(&preloader, t0 + ms(1100), UiOptions::default());
    assert!(!closed.backend().contents().contains("Welcome"));

    let parting = render(&preloader, t0 + ms(1500), UiOptions::default());
    let screen = parting.backend();
    assert!(screen.contents().contains("Welcome"));
    assert!(!screen.contents().contains("WELCOME"));
    assert!(screen.row(0).is_empty());
    assert!(screen.contents().contains("READY"));
}

#[test]
fn ascii_only_renders_plain_ascii() {
    let t0 = Instant::now();
    let preloader = started(&["HELLO", "WELCOME"], 2, t0);
    let options = UiOptions {
        ascii_only: true,
        ..UiOptions::default()
    };
    let terminal = render(&preloader, t0 + ms(500), options);
    let contents = terminal.backend().contents();

    assert!(contents.is_ascii(), "{contents}");
    assert!(contents.contains("o LOADING"), "{contents}");
    assert!(contents.contains("0%"), "{contents}");
}

#[test]
fn reduced_motion_skips_entry_animation() {
    let t0 = Instant::now();
    let preloader = started(&["HELLO", "WELCOME"], 2, t0);
    let options = UiOptions {
        reduced_motion: true,
        ..UiOptions::default()
    };
    let terminal = render(&preloader, t0, options);

    assert_eq!(terminal.backend().find_row("HELLO"), Some(BASELINE));
}
