//! End-to-end tests for the grid controller against the in-memory backend.
//!
//! Requests queued by the controller are executed inline, so every test
//! runs the same request/outcome round trip the dashboard uses, without
//! worker threads.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pricedesk::api::{MemoryPricingApi, Mutation, Request, execute};
use pricedesk::error::ApiErrorKind;
use pricedesk::grid::{
    ActiveCell, ClipboardSink, EditField, EventResult, Focusable, GridContext, GridController,
    GridSettings, GridState, PageVariant, ToastLevel, ViewMode,
};
use pricedesk::model::{ColorTag, PriceList, Product, ProductId};
use std::sync::{Arc, Mutex};

// ============================================================================
// Helpers
// ============================================================================

#[derive(Default, Clone)]
struct RecordingClipboard(Arc<Mutex<Vec<String>>>);

impl RecordingClipboard {
    fn writes(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl ClipboardSink for RecordingClipboard {
    fn write_text(&mut self, text: &str) -> bool {
        self.0.lock().unwrap().push(text.to_string());
        true
    }
}

fn catalog(n: u64) -> Vec<Product> {
    (1..=n)
        .map(|i| {
            let mut p = Product::new(i, format!("P{i:03}"));
            p.description = format!("Product {i}");
            p.classic_price = Some(10_000.0 * i as f64);
            p
        })
        .collect()
}

struct Harness {
    api: MemoryPricingApi,
    grid: GridController,
    clipboard: RecordingClipboard,
}

impl Harness {
    fn new(products: Vec<Product>) -> Self {
        Self::on_page(products, PageVariant::Catalog)
    }

    fn on_page(products: Vec<Product>, page: PageVariant) -> Self {
        let clipboard = RecordingClipboard::default();
        let grid = GridController::new(page, GridSettings::default(), Box::new(clipboard.clone()));
        let mut harness = Self {
            api: MemoryPricingApi::new(products),
            grid,
            clipboard,
        };
        harness.grid.reload();
        harness.pump();
        harness
    }

    /// Run queued requests until the controller stops queuing new ones.
    fn pump(&mut self) {
        loop {
            let requests = self.grid.take_requests();
            if requests.is_empty() {
                break;
            }
            self.run(requests);
        }
    }

    /// Run the given requests once, leaving any follow-ups queued.
    fn run(&mut self, requests: Vec<Request>) {
        for request in requests {
            let outcome = execute(&self.api, request);
            self.grid.apply_outcome(outcome);
        }
    }

    /// The single mutation the controller queued.
    fn queued_mutation(&mut self) -> (Mutation, Vec<Request>) {
        let requests = self.grid.take_requests();
        match requests.as_slice() {
            [Request::Mutate { mutation, .. }] => (mutation.clone(), requests),
            other => panic!("expected one mutation, got {other:?}"),
        }
    }

    fn key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> EventResult {
        self.grid
            .handle_key(KeyEvent::new(code, modifiers), GridContext::default())
    }

    fn press(&mut self, code: KeyCode) -> EventResult {
        self.key(code, KeyModifiers::NONE)
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    fn clear_buffer(&mut self) {
        while self
            .grid
            .edit()
            .is_some_and(|session| !session.buffer().is_empty())
        {
            self.press(KeyCode::Backspace);
        }
    }

    fn toast(&self) -> Option<(ToastLevel, String)> {
        self.grid
            .toast()
            .peek()
            .map(|(level, text)| (level, text.to_string()))
    }
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn test_enter_from_idle_activates_first_cell() {
    let mut h = Harness::new(catalog(3));
    assert_eq!(h.grid.state(), GridState::Idle);
    assert_eq!(h.grid.cursor(), None);

    assert_eq!(h.press(KeyCode::Enter), EventResult::Consumed);
    assert_eq!(h.grid.cursor(), Some(ActiveCell::new(0, 0)));
    assert_eq!(h.grid.state(), GridState::Navigating);
}

#[test]
fn test_five_product_walkthrough() {
    let mut h = Harness::new(catalog(5));
    h.press(KeyCode::Enter);
    assert_eq!(h.grid.cursor(), Some(ActiveCell::new(0, 0)));

    for _ in 0..3 {
        h.press(KeyCode::Down);
    }
    assert_eq!(h.grid.cursor(), Some(ActiveCell::new(3, 0)));

    h.press(KeyCode::PageUp);
    assert_eq!(h.grid.cursor(), Some(ActiveCell::new(0, 0)));

    h.press(KeyCode::End);
    let last = h.grid.columns().len() - 1;
    assert_eq!(h.grid.cursor(), Some(ActiveCell::new(0, last)));

    h.press(KeyCode::Home);
    assert_eq!(h.grid.cursor().map(|c| c.col), Some(0));
}

#[test]
fn test_view_switch_resets_column() {
    let mut h = Harness::on_page(catalog(2), PageVariant::Store);
    h.press(KeyCode::Enter);
    h.press(KeyCode::Down);
    h.press(KeyCode::End);
    assert_ne!(h.grid.cursor().map(|c| c.col), Some(0));

    h.press(KeyCode::Char('v'));
    assert_eq!(h.grid.view(), ViewMode::Installments);
    assert_eq!(h.grid.cursor(), Some(ActiveCell::new(1, 0)));

    h.press(KeyCode::End);
    h.press(KeyCode::Char('v'));
    assert_eq!(h.grid.view(), ViewMode::Pvp);
    assert_eq!(h.grid.cursor().map(|c| c.col), Some(0));

    h.press(KeyCode::Char('v'));
    assert_eq!(h.grid.view(), ViewMode::Normal);
}

#[test]
fn test_catalog_page_has_no_pvp_view() {
    let mut h = Harness::new(catalog(1));
    h.press(KeyCode::Enter);
    h.press(KeyCode::Char('v'));
    h.press(KeyCode::Char('v'));
    assert_eq!(h.grid.view(), ViewMode::Normal);
}

#[test]
fn test_escape_outside_edit_clears_cursor() {
    let mut h = Harness::new(catalog(2));
    h.press(KeyCode::Enter);
    assert_eq!(h.press(KeyCode::Esc), EventResult::Dismissed);
    assert_eq!(h.grid.cursor(), None);
    assert_eq!(h.grid.state(), GridState::Idle);
}

// ============================================================================
// Editing
// ============================================================================

#[test]
fn test_escape_from_edit_keeps_cell_and_discards_value() {
    let mut h = Harness::new(catalog(3));
    h.press(KeyCode::Enter);
    h.press(KeyCode::Down);
    h.press(KeyCode::Enter);
    assert_eq!(h.grid.state(), GridState::Editing);

    h.clear_buffer();
    h.type_text("1");
    assert_eq!(h.press(KeyCode::Esc), EventResult::Consumed);

    assert_eq!(h.grid.state(), GridState::Navigating);
    assert_eq!(h.grid.cursor(), Some(ActiveCell::new(1, 0)));
    assert!(h.grid.take_requests().is_empty());
    assert_eq!(h.grid.products()[1].classic_price, Some(20_000.0));

    // Reopening seeds from the stored value, not the discarded input
    h.press(KeyCode::Enter);
    assert_eq!(h.grid.edit().map(|s| s.buffer().to_string()).as_deref(), Some("20000"));
}

#[test]
fn test_comma_decimal_price_is_saved() {
    let mut h = Harness::new(catalog(1));
    h.press(KeyCode::Enter);
    h.press(KeyCode::Enter);
    h.clear_buffer();
    h.type_text("123,45");
    h.press(KeyCode::Enter);

    let requests = h.grid.take_requests();
    assert!(matches!(
        requests.as_slice(),
        [Request::Mutate {
            mutation: Mutation::SetPrice { list: PriceList::Web, value, .. },
            ..
        }] if (*value - 123.45).abs() < f64::EPSILON
    ));

    for request in requests {
        let outcome = execute(&h.api, request);
        h.grid.apply_outcome(outcome);
    }
    assert_eq!(h.grid.products()[0].classic_price, Some(123.45));
    assert_eq!(h.api.product(ProductId(1)).unwrap().classic_price, Some(123.45));
}

#[test]
fn test_thousands_separator_price() {
    let mut h = Harness::new(catalog(1));
    h.press(KeyCode::Enter);
    h.press(KeyCode::Enter);
    h.clear_buffer();
    h.type_text("$ 1.234,56");
    h.press(KeyCode::Enter);
    h.pump();
    assert_eq!(h.grid.products()[0].classic_price, Some(1234.56));
}

#[test]
fn test_invalid_price_keeps_previous_value() {
    let mut h = Harness::new(catalog(1));
    h.press(KeyCode::Enter);
    h.press(KeyCode::Enter);
    h.clear_buffer();
    h.press(KeyCode::Char('-'));
    h.type_text("5");
    h.press(KeyCode::Enter);

    assert!(h.grid.take_requests().is_empty());
    assert_eq!(h.grid.products()[0].classic_price, Some(10_000.0));
    assert!(matches!(h.toast(), Some((ToastLevel::Warning, _))));
}

#[test]
fn test_failed_mutation_leaves_row_untouched() {
    let mut h = Harness::new(catalog(1));
    h.api.fail_with(Some(ApiErrorKind::Unauthorized));
    h.press(KeyCode::Enter);
    h.press(KeyCode::Char('3'));
    h.pump();

    assert_eq!(h.grid.products()[0].color, ColorTag::None);
    let (level, text) = h.toast().unwrap();
    assert_eq!(level, ToastLevel::Error);
    assert!(text.contains("Not authorized"));
}

// ============================================================================
// Digit shortcuts
// ============================================================================

#[test]
fn test_digit_paints_active_row() {
    let mut h = Harness::new(catalog(3));
    h.press(KeyCode::Enter);
    h.press(KeyCode::Down);
    h.press(KeyCode::Char('1'));
    h.pump();

    assert_eq!(h.grid.products()[1].color, ColorTag::Red);
    assert_eq!(h.grid.products()[0].color, ColorTag::None);
    assert_eq!(h.api.calls().last().map(String::as_str), Some("set_color 2"));
}

#[test]
fn test_digits_ignored_outside_navigation() {
    let mut h = Harness::new(catalog(2));

    // Idle
    assert_eq!(h.press(KeyCode::Char('2')), EventResult::Ignored);
    assert!(h.grid.take_requests().is_empty());

    h.press(KeyCode::Enter);

    // Text input elsewhere has focus
    let text_input = GridContext {
        text_input_focused: true,
        ..GridContext::default()
    };
    let digit = KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE);
    assert_eq!(h.grid.handle_key(digit, text_input), EventResult::Ignored);

    // A modal is open
    let modal = GridContext {
        modal_open: true,
        ..GridContext::default()
    };
    assert_eq!(h.grid.handle_key(digit, modal), EventResult::Ignored);
    assert!(h.grid.take_requests().is_empty());

    // Editing: the digit goes into the buffer
    h.press(KeyCode::Enter);
    h.clear_buffer();
    h.press(KeyCode::Char('2'));
    assert_eq!(h.grid.edit().map(|s| s.buffer().to_string()).as_deref(), Some("2"));
    assert!(h.grid.take_requests().is_empty());
    assert_eq!(h.grid.products()[0].color, ColorTag::None);
}

// ============================================================================
// Clipboard
// ============================================================================

#[test]
fn test_ctrl_f1_copies_product_code() {
    let mut products = catalog(2);
    products[0].code = "ABC123".to_string();
    let mut h = Harness::new(products);
    h.press(KeyCode::Enter);

    h.key(KeyCode::F(1), KeyModifiers::CONTROL);
    assert_eq!(h.clipboard.writes(), vec!["ABC123".to_string()]);
    assert!(matches!(h.toast(), Some((ToastLevel::Success, _))));
}

#[test]
fn test_clipboard_works_with_modal_open() {
    let mut products = catalog(1);
    products[0].code = "ABC123".to_string();
    let mut h = Harness::new(products);
    h.press(KeyCode::Enter);

    let modal = GridContext {
        modal_open: true,
        ..GridContext::default()
    };
    let key = KeyEvent::new(
        KeyCode::Char('!'),
        KeyModifiers::CONTROL | KeyModifiers::SHIFT,
    );
    assert_eq!(h.grid.handle_key(key, modal), EventResult::Consumed);
    assert_eq!(h.clipboard.writes(), vec!["ABC123".to_string()]);
}

#[test]
fn test_empty_code_is_not_copied() {
    let mut products = catalog(1);
    products[0].code = "  ".to_string();
    let mut h = Harness::new(products);
    h.press(KeyCode::Enter);

    h.key(KeyCode::F(1), KeyModifiers::CONTROL);
    assert!(h.clipboard.writes().is_empty());
    assert!(matches!(h.toast(), Some((ToastLevel::Error, _))));
}

#[test]
fn test_clipboard_without_active_cell() {
    let mut h = Harness::new(catalog(1));
    h.key(KeyCode::F(1), KeyModifiers::CONTROL);
    assert!(h.clipboard.writes().is_empty());
    assert!(matches!(h.toast(), Some((ToastLevel::Error, _))));
}

// ============================================================================
// Selection and batch paint
// ============================================================================

#[test]
fn test_batch_paint_updates_only_selected() {
    let mut h = Harness::new(catalog(5));
    h.press(KeyCode::Enter);
    h.press(KeyCode::Char('x'));
    h.press(KeyCode::Down);
    h.press(KeyCode::Char('x'));
    h.press(KeyCode::Down);
    h.press(KeyCode::Down);
    h.press(KeyCode::Char('x'));
    assert_eq!(h.grid.selection().len(), 3);

    h.grid.paint_selection(ColorTag::Red);
    h.pump();

    let colors: Vec<ColorTag> = h.grid.products().iter().map(|p| p.color).collect();
    assert_eq!(
        colors,
        vec![
            ColorTag::Red,
            ColorTag::Red,
            ColorTag::None,
            ColorTag::Red,
            ColorTag::None,
        ]
    );
    assert!(h.grid.selection().is_empty());
    assert!(h.api.calls().contains(&"set_color_batch 3".to_string()));
}

#[test]
fn test_failed_batch_paint_keeps_selection() {
    let mut h = Harness::new(catalog(3));
    h.press(KeyCode::Enter);
    h.key(KeyCode::Char('a'), KeyModifiers::CONTROL);
    assert_eq!(h.grid.selection().len(), 3);

    h.api.fail_with(Some(ApiErrorKind::Network("connection reset".into())));
    h.grid.paint_selection(ColorTag::Blue);
    h.pump();

    assert_eq!(h.grid.selection().len(), 3);
    assert!(h.grid.products().iter().all(|p| p.color == ColorTag::None));
}

#[test]
fn test_shift_arrow_extends_selection() {
    let mut h = Harness::new(catalog(4));
    h.press(KeyCode::Enter);
    h.key(KeyCode::Down, KeyModifiers::SHIFT);
    h.key(KeyCode::Down, KeyModifiers::SHIFT);
    assert!(h.grid.selection().contains(ProductId(2)));
    assert!(h.grid.selection().contains(ProductId(3)));

    // Ctrl+arrow moves without touching the selection
    h.key(KeyCode::Down, KeyModifiers::CONTROL);
    assert_eq!(h.grid.cursor().map(|c| c.row), Some(3));
    assert!(!h.grid.selection().contains(ProductId(4)));
}

// ============================================================================
// Rebate / out-of-cards coupling
// ============================================================================

#[test]
fn test_out_of_cards_enables_rebate_first() {
    let mut h = Harness::new(catalog(1));
    h.press(KeyCode::Enter);
    assert!(!h.grid.products()[0].rebate.enabled);

    h.press(KeyCode::Char('o'));
    let session = h.grid.edit().expect("rebate session opened");
    assert_eq!(session.field(), EditField::Rebate);
    assert_eq!(session.buffer(), "3.8");
    h.pump();

    let product = &h.grid.products()[0];
    assert!(product.rebate.enabled);
    assert!(product.out_of_cards);
    assert_eq!(h.grid.state(), GridState::Editing);
    let calls = h.api.calls();
    assert_eq!(
        &calls[calls.len() - 2..],
        &["set_rebate 1".to_string(), "set_out_of_cards 1".to_string()]
    );
}

#[test]
fn test_out_of_cards_with_rebate_on_opens_no_session() {
    let mut products = catalog(1);
    products[0].rebate.enabled = true;
    products[0].rebate.percentage = Some(5.0);
    let mut h = Harness::new(products);
    h.press(KeyCode::Enter);
    h.press(KeyCode::Char('o'));
    assert!(h.grid.edit().is_none());
    h.pump();
    assert!(h.grid.products()[0].out_of_cards);
    assert_eq!(h.grid.products()[0].rebate.percentage, Some(5.0));
}

#[test]
fn test_disabling_rebate_clears_out_of_cards() {
    let mut products = catalog(1);
    products[0].rebate.enabled = true;
    products[0].out_of_cards = true;
    let mut h = Harness::new(products);
    h.press(KeyCode::Enter);
    h.press(KeyCode::Char('r'));
    h.pump();

    let product = &h.grid.products()[0];
    assert!(!product.rebate.enabled);
    assert!(!product.out_of_cards);
}

#[test]
fn test_out_of_cards_is_sent_after_rebate_succeeds() {
    let mut h = Harness::new(catalog(1));
    h.press(KeyCode::Enter);
    h.press(KeyCode::Char('o'));

    let (mutation, requests) = h.queued_mutation();
    assert_eq!(
        mutation,
        Mutation::SetRebate {
            enabled: true,
            percentage: 3.8
        }
    );
    h.run(requests);

    let (mutation, requests) = h.queued_mutation();
    assert_eq!(mutation, Mutation::SetOutOfCards(true));
    h.run(requests);
    assert!(h.grid.products()[0].out_of_cards);
    assert!(h.grid.take_requests().is_empty());
}

#[test]
fn test_failed_rebate_does_not_send_out_of_cards() {
    let mut h = Harness::new(catalog(1));
    h.press(KeyCode::Enter);
    h.press(KeyCode::Char('o'));
    h.api.fail_with(Some(ApiErrorKind::Unauthorized));
    h.pump();

    let calls = h.api.calls();
    assert_eq!(calls.last().map(String::as_str), Some("set_rebate 1"));
    assert!(!calls.iter().any(|c| c.starts_with("set_out_of_cards")));

    let product = &h.grid.products()[0];
    assert!(!product.rebate.enabled);
    assert!(!product.out_of_cards);
    let (level, text) = h.toast().unwrap();
    assert_eq!(level, ToastLevel::Error);
    assert!(text.contains("out-of-cards not enabled"), "{text}");
}

#[test]
fn test_r_turns_rebate_on_with_default_percentage() {
    let mut h = Harness::new(catalog(2));
    h.press(KeyCode::Enter);
    h.press(KeyCode::Down);
    h.press(KeyCode::Char('r'));

    let (mutation, requests) = h.queued_mutation();
    assert_eq!(
        mutation,
        Mutation::SetRebate {
            enabled: true,
            percentage: 3.8
        }
    );
    assert!(h.grid.edit().is_none());
    h.run(requests);

    let product = &h.grid.products()[1];
    assert!(product.rebate.enabled);
    assert_eq!(product.rebate.percentage, Some(3.8));
    assert!(!h.grid.products()[0].rebate.enabled);
    assert_eq!(
        h.toast(),
        Some((ToastLevel::Success, "P002: rebate on (3.8%)".to_string()))
    );
    assert_eq!(h.grid.state(), GridState::Navigating);
}

#[test]
fn test_w_toggles_web_transfer_keeping_percentage() {
    let mut products = catalog(1);
    products[0].web_transfer.percentage = Some(7.5);
    let mut h = Harness::new(products);
    h.press(KeyCode::Enter);

    h.press(KeyCode::Char('w'));
    let (mutation, requests) = h.queued_mutation();
    assert_eq!(
        mutation,
        Mutation::SetWebTransfer {
            enabled: true,
            percentage: 7.5,
            preserve: true
        }
    );
    h.run(requests);
    assert!(h.grid.products()[0].web_transfer.enabled);
    assert_eq!(h.grid.products()[0].web_transfer.percentage, Some(7.5));

    h.press(KeyCode::Char('w'));
    h.pump();
    assert!(!h.grid.products()[0].web_transfer.enabled);
    assert_eq!(h.grid.products()[0].web_transfer.percentage, Some(7.5));
}

#[test]
fn test_tab_walks_edit_controls() {
    let mut h = Harness::new(catalog(1));
    h.press(KeyCode::Enter);
    h.press(KeyCode::End);
    h.press(KeyCode::Enter);
    let session = h.grid.edit().expect("web transfer session");
    assert_eq!(session.field(), EditField::WebTransfer);
    assert_eq!(session.buffer(), "6");

    // Shift+Tab from the value wraps to Cancel
    h.key(KeyCode::BackTab, KeyModifiers::SHIFT);
    assert_eq!(h.grid.edit().map(|e| e.focused()), Some(Focusable::Cancel));
    h.press(KeyCode::Tab);
    assert_eq!(h.grid.edit().map(|e| e.focused()), Some(Focusable::Value));

    // Enter on Cancel closes without a request
    h.press(KeyCode::Tab);
    h.press(KeyCode::Tab);
    h.press(KeyCode::Tab);
    assert_eq!(h.grid.edit().map(|e| e.focused()), Some(Focusable::Cancel));
    h.press(KeyCode::Enter);
    assert!(h.grid.edit().is_none());
    assert!(h.grid.take_requests().is_empty());
    assert_eq!(h.grid.cursor(), Some(ActiveCell::new(0, 3)));

    // Space on Preserve flips it, Enter on Save commits
    h.press(KeyCode::Enter);
    h.press(KeyCode::Tab);
    assert_eq!(h.grid.edit().map(|e| e.focused()), Some(Focusable::Preserve));
    h.press(KeyCode::Char(' '));
    assert_eq!(h.grid.edit().map(|e| e.preserve()), Some(true));
    h.press(KeyCode::Tab);
    assert_eq!(h.grid.edit().map(|e| e.focused()), Some(Focusable::Save));
    h.press(KeyCode::Enter);

    let (mutation, _) = h.queued_mutation();
    assert_eq!(
        mutation,
        Mutation::SetWebTransfer {
            enabled: true,
            percentage: 6.0,
            preserve: true
        }
    );
    assert_eq!(h.grid.state(), GridState::Navigating);
}

// ============================================================================
// Reload
// ============================================================================

#[test]
fn test_filter_reload_clamps_cursor_and_prunes_selection() {
    let mut h = Harness::new(catalog(5));
    h.press(KeyCode::Enter);
    h.key(KeyCode::Char('a'), KeyModifiers::CONTROL);
    h.press(KeyCode::PageDown);
    assert_eq!(h.grid.cursor().map(|c| c.row), Some(4));

    h.grid.update_filter(|f| f.set_search("P002"));
    h.pump();

    assert_eq!(h.grid.products().len(), 1);
    assert_eq!(h.grid.cursor(), Some(ActiveCell::new(0, 0)));
    assert_eq!(h.grid.selection().len(), 1);
    assert!(h.grid.stats().is_some());

    h.grid.update_filter(|f| f.set_search("nothing matches"));
    h.pump();
    assert!(h.grid.products().is_empty());
    assert_eq!(h.grid.state(), GridState::Idle);
}
