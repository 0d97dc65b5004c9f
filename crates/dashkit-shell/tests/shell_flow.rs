#![forbid(unsafe_code)]

//! End-to-end flows through the shell, with every collaborator recording
//! into one shared log so the tests can assert global ordering across the
//! overlay, dialog, and navigation seams.

use std::cell::RefCell;
use std::rc::Rc;

use dashkit_prefs::PreferenceStore;
use dashkit_shell::{
    ConfirmPrompt, Decision, DestructiveTrigger, DialogProvider, FormHost, LayoutTokens, Navigator,
    Notice, OverlaySurface, PageEvent, Presentation, Shell, SidebarState, SidebarSurface,
};

type Log = Rc<RefCell<Vec<String>>>;

fn log(entries: &Log, entry: impl Into<String>) {
    entries.borrow_mut().push(entry.into());
}

struct LoggingOverlay(Log);

impl OverlaySurface for LoggingOverlay {
    fn show(&mut self, message: &str) {
        log(&self.0, format!("overlay.show({message})"));
    }
    fn hide(&mut self) {
        log(&self.0, "overlay.hide");
    }
}

struct LoggingSidebar(Log);

impl SidebarSurface for LoggingSidebar {
    fn apply(&mut self, state: SidebarState, layout: Option<LayoutTokens>) {
        log(
            &self.0,
            format!("sidebar.apply({state:?}, layout={})", layout.is_some()),
        );
    }
}

struct LoggingNavigator(Log);

impl Navigator for LoggingNavigator {
    fn navigate(&mut self, target: &str) {
        log(&self.0, format!("navigate({target})"));
    }
}

struct LoggingForms(Log);

impl FormHost for LoggingForms {
    fn submit(&mut self, form_id: &str) {
        log(&self.0, format!("submit({form_id})"));
    }
}

/// Answers every prompt with a canned presentation and logs everything.
struct LoggingDialog {
    log: Log,
    answer: Presentation,
}

impl DialogProvider for LoggingDialog {
    fn present_confirm(&mut self, prompt: &ConfirmPrompt) -> Presentation {
        log(&self.log, format!("confirm({})", prompt.title));
        self.answer
    }
    fn toast(&mut self, notice: &Notice) {
        log(
            &self.log,
            format!("toast({}:{})", notice.level.label(), notice.message),
        );
    }
}

fn wired_shell(answer: Presentation) -> (Shell, Log) {
    let entries: Log = Rc::new(RefCell::new(Vec::new()));
    let mut shell = Shell::builder()
        .dialog(Box::new(LoggingDialog {
            log: Rc::clone(&entries),
            answer,
        }))
        .overlay_surface(Box::new(LoggingOverlay(Rc::clone(&entries))))
        .sidebar_surface(Box::new(LoggingSidebar(Rc::clone(&entries))))
        .navigator(LoggingNavigator(Rc::clone(&entries)))
        .forms(LoggingForms(Rc::clone(&entries)))
        .build();
    shell.init();
    entries.borrow_mut().clear();
    (shell, entries)
}

#[test]
fn confirmed_delete_link_runs_overlay_then_navigates_then_toasts() {
    let (mut shell, entries) = wired_shell(Presentation::Decided(Decision::Confirmed));

    shell.handle_event(PageEvent::DestructiveTriggered(DestructiveTrigger::link(
        "client #12",
        "/clients/12/delete",
    )));

    assert_eq!(
        *entries.borrow(),
        vec![
            "confirm(Are you sure?)".to_string(),
            "overlay.show(Processing request...)".to_string(),
            "navigate(/clients/12/delete)".to_string(),
            "overlay.hide".to_string(),
            "toast(SUCCESS:The record has been deleted.)".to_string(),
        ]
    );
    assert!(!shell.confirmation_pending());
    assert!(!shell.overlay().visible());
}

#[test]
fn confirmed_delete_form_submits_the_form() {
    let (mut shell, entries) = wired_shell(Presentation::Decided(Decision::Confirmed));

    shell.handle_event(PageEvent::DestructiveTriggered(DestructiveTrigger::submit(
        "report",
        "delete-report-form",
    )));

    let entries = entries.borrow();
    assert!(entries.contains(&"submit(delete-report-form)".to_string()));
    assert!(entries.iter().any(|e| e.starts_with("toast(SUCCESS")));
}

#[test]
fn cancelled_delete_runs_nothing() {
    let (mut shell, entries) = wired_shell(Presentation::Decided(Decision::Cancelled));

    shell.handle_event(PageEvent::DestructiveTriggered(DestructiveTrigger::link(
        "client #12",
        "/clients/12/delete",
    )));

    // The prompt is the only observable effect.
    assert_eq!(*entries.borrow(), vec!["confirm(Are you sure?)".to_string()]);
    assert!(!shell.confirmation_pending());
}

#[test]
fn deferred_provider_resolves_through_the_shell() {
    let (mut shell, entries) = wired_shell(Presentation::Displayed);

    shell.handle_event(PageEvent::DestructiveTriggered(DestructiveTrigger::link(
        "first", "/first",
    )));
    assert!(shell.confirmation_pending());

    // A second trigger while the prompt is up must not displace the first.
    shell.handle_event(PageEvent::DestructiveTriggered(DestructiveTrigger::link(
        "second", "/second",
    )));

    shell.resolve_confirmation(Decision::Confirmed);
    let entries = entries.borrow();
    assert!(entries.contains(&"navigate(/first)".to_string()));
    assert!(!entries.contains(&"navigate(/second)".to_string()));
    assert_eq!(entries.iter().filter(|e| e.starts_with("confirm(")).count(), 1);
}

#[test]
fn nested_work_keeps_the_first_overlay_message() {
    let (mut shell, entries) = wired_shell(Presentation::Displayed);

    shell.handle_event(PageEvent::NavigateWithLoading("/reports".to_string()));
    shell.export_data("csv", dashkit_shell::Immediate::ok());
    shell.handle_event(PageEvent::PageLoaded);

    let entries = entries.borrow();
    // One show with the navigation's message, one hide at the very end; the
    // export never swaps the message or blinks the overlay.
    assert_eq!(
        entries.iter().filter(|e| e.starts_with("overlay.show")).count(),
        1
    );
    assert_eq!(entries[0], "overlay.show(Processing request...)");
    assert_eq!(entries.last().unwrap(), "overlay.hide");
    assert!(entries.contains(&"toast(SUCCESS:Data exported as CSV)".to_string()));
}

#[test]
fn outside_click_dismisses_only_below_the_wide_breakpoint() {
    let (mut shell, _) = wired_shell(Presentation::Displayed);

    // Wide viewport: the sidebar is docked, outside clicks leave it alone.
    shell.handle_event(PageEvent::ViewportResized(1280));
    shell.handle_event(PageEvent::SidebarToggle);
    shell.handle_event(PageEvent::SidebarToggle);
    assert_eq!(shell.sidebar_state(), SidebarState::Expanded);
    shell.handle_event(PageEvent::OutsideClick(dashkit_shell::ClickTarget::outside()));
    assert_eq!(shell.sidebar_state(), SidebarState::Expanded);

    // Overlay-style viewport: the same click collapses it.
    shell.handle_event(PageEvent::ViewportResized(800));
    shell.handle_event(PageEvent::OutsideClick(dashkit_shell::ClickTarget::outside()));
    assert_eq!(shell.sidebar_state(), SidebarState::Collapsed);
}

#[test]
fn escape_dismisses_at_any_width() {
    let (mut shell, _) = wired_shell(Presentation::Displayed);
    shell.handle_event(PageEvent::ViewportResized(1280));
    assert_eq!(shell.sidebar_state(), SidebarState::Expanded);
    shell.handle_event(PageEvent::EscapePressed);
    assert_eq!(shell.sidebar_state(), SidebarState::Collapsed);
}

#[test]
fn sidebar_preference_survives_a_page_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    let entries: Log = Rc::new(RefCell::new(Vec::new()));
    let mut shell = Shell::builder()
        .dialog(Box::new(LoggingDialog {
            log: Rc::clone(&entries),
            answer: Presentation::Displayed,
        }))
        .prefs(PreferenceStore::with_file(&path))
        .build();
    shell.init();

    shell.handle_event(PageEvent::SidebarToggle);
    assert_eq!(shell.sidebar_state(), SidebarState::Collapsed);
    shell.handle_event(PageEvent::PageTeardown);

    // A fresh shell over the same file comes up collapsed.
    let mut next = Shell::builder()
        .dialog(Box::new(LoggingDialog {
            log: Rc::clone(&entries),
            answer: Presentation::Displayed,
        }))
        .prefs(PreferenceStore::with_file(&path))
        .build();
    next.init();
    assert_eq!(next.sidebar_state(), SidebarState::Collapsed);
}

#[test]
fn unreadable_prefs_file_degrades_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, r#"{"format_version": 99, "prefs": {"sidebarCollapsed": "true"}}"#)
        .unwrap();

    let entries: Log = Rc::new(RefCell::new(Vec::new()));
    let mut shell = Shell::builder()
        .dialog(Box::new(LoggingDialog {
            log: Rc::clone(&entries),
            answer: Presentation::Displayed,
        }))
        .prefs(PreferenceStore::with_file(&path))
        .build();
    shell.init();

    // The stored flag is unreadable, so the sidebar comes up expanded and
    // the page keeps working.
    assert_eq!(shell.sidebar_state(), SidebarState::Expanded);
    shell.handle_event(PageEvent::SidebarToggle);
    assert_eq!(shell.sidebar_state(), SidebarState::Collapsed);
}

#[test]
fn connectivity_and_search_notices_carry_levels() {
    let (mut shell, entries) = wired_shell(Presentation::Displayed);

    shell.handle_event(PageEvent::ConnectivityChanged(false));
    shell.handle_event(PageEvent::ConnectivityChanged(true));
    shell.handle_event(PageEvent::SearchSubmitted("at-risk".to_string()));

    let entries = entries.borrow();
    assert_eq!(entries[0], "toast(WARNING:Internet connection lost)");
    assert_eq!(entries[1], "toast(SUCCESS:Internet connection restored)");
    // The search runs under the overlay; its notice follows the hide.
    assert_eq!(entries[2], "overlay.show(Processing request...)");
    assert_eq!(entries[3], "overlay.hide");
    assert!(entries[4].starts_with("toast(INFO:Searching for \"at-risk\""));
    assert_eq!(entries.len(), 5);
}
