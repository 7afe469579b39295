//! The grid state machine.

use super::columns::{ColumnSet, EditField, PageVariant, ViewMode};
use super::cursor::ActiveCell;
use super::edit::{Commit, EditSession, PricingDefaults};
use super::focus::Focusable;
use super::keys::{self, ClipboardTarget, GridKey, MoveMode};
use super::scroll::Viewport;
use super::selection::SelectionSet;
use super::toast::{TOAST_DURATION, Toast};
use super::{ClipboardSink, EventResult, GridContext};
use crate::api::{FieldKey, Mutation, Outcome, Request, Ticket};
use crate::config::{DEFAULT_LISTING_URL, DEFAULT_SEARCH_URL};
use crate::model::{
    CatalogStats, ColorTag, FilterState, Permissions, Product, ProductId, ProductPage,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Where keyboard input goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridState {
    /// No active cell
    Idle,
    /// An active cell, no open edit
    Navigating,
    /// An edit session has the keyboard
    Editing,
}

/// Configuration the grid needs at runtime.
#[derive(Debug, Clone)]
pub struct GridSettings {
    pub defaults: PricingDefaults,
    /// Marketplace listing URL with a `{code}` placeholder
    pub listing_url: String,
    /// Marketplace search URL with a `{code}` placeholder
    pub search_url: String,
    /// Ask the backend to recompute installments after a price change
    pub auto_recalculate_installments: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            defaults: PricingDefaults::default(),
            listing_url: DEFAULT_LISTING_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            auto_recalculate_installments: true,
        }
    }
}

/// Keyboard controller for the product grid.
pub struct GridController {
    page: PageVariant,
    view: ViewMode,
    settings: GridSettings,
    permissions: Permissions,
    products: Vec<Product>,
    total: u64,
    stats: Option<CatalogStats>,
    filter: FilterState,
    cursor: Option<ActiveCell>,
    edit: Option<EditSession>,
    selection: SelectionSet,
    viewport: Viewport,
    toast: Toast,
    clipboard: Box<dyn ClipboardSink>,
    outbox: Vec<Request>,
    next_ticket: Ticket,
    latest: HashMap<(ProductId, FieldKey), Ticket>,
    latest_reload: Ticket,
    /// Out-of-cards waiting on the rebate ticket that must succeed first
    pending_out_of_cards: HashMap<ProductId, Ticket>,
    loading: bool,
}

impl GridController {
    #[must_use]
    pub fn new(
        page: PageVariant,
        settings: GridSettings,
        clipboard: Box<dyn ClipboardSink>,
    ) -> Self {
        Self {
            page,
            view: ViewMode::Normal,
            settings,
            permissions: Permissions::all(),
            products: Vec::new(),
            total: 0,
            stats: None,
            filter: FilterState::default(),
            cursor: None,
            edit: None,
            selection: SelectionSet::new(),
            viewport: Viewport::default(),
            toast: Toast::with_auto_clear(TOAST_DURATION),
            clipboard,
            outbox: Vec::new(),
            next_ticket: 0,
            latest: HashMap::new(),
            latest_reload: 0,
            pending_out_of_cards: HashMap::new(),
            loading: false,
        }
    }

    #[must_use]
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: FilterState) -> Self {
        self.filter = filter;
        self
    }

    pub const fn set_permissions(&mut self, permissions: Permissions) {
        self.permissions = permissions;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub const fn state(&self) -> GridState {
        match (&self.edit, &self.cursor) {
            (Some(_), _) => GridState::Editing,
            (None, Some(_)) => GridState::Navigating,
            (None, None) => GridState::Idle,
        }
    }

    #[must_use]
    pub const fn page(&self) -> PageVariant {
        self.page
    }

    #[must_use]
    pub const fn view(&self) -> ViewMode {
        self.view
    }

    #[must_use]
    pub const fn columns(&self) -> ColumnSet {
        self.view.columns(self.page)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub const fn stats(&self) -> Option<&CatalogStats> {
        self.stats.as_ref()
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub const fn cursor(&self) -> Option<ActiveCell> {
        self.cursor
    }

    #[must_use]
    pub const fn edit(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub const fn permissions(&self) -> Permissions {
        self.permissions
    }

    #[must_use]
    pub const fn settings(&self) -> &GridSettings {
        &self.settings
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub const fn toast_mut(&mut self) -> &mut Toast {
        &mut self.toast
    }

    #[must_use]
    pub const fn toast(&self) -> &Toast {
        &self.toast
    }

    /// Drop the active cell. Has no effect on an open edit session's row.
    pub const fn clear_cursor(&mut self) {
        if self.edit.is_none() {
            self.cursor = None;
        }
    }

    /// Product under the active cell.
    #[must_use]
    pub fn active_product(&self) -> Option<&Product> {
        self.cursor.and_then(|c| self.products.get(c.row))
    }

    fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    fn product_ids(&self) -> Vec<ProductId> {
        self.products.iter().map(|p| p.id).collect()
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Drain the queued requests.
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    const fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        self.next_ticket
    }

    fn queue_mutation(&mut self, product: ProductId, mutation: Mutation) -> Ticket {
        let ticket = self.issue_ticket();
        self.latest.insert((product, mutation.field()), ticket);
        self.outbox.push(Request::Mutate {
            ticket,
            product,
            mutation,
        });
        ticket
    }

    /// Queue a product reload and a stats refresh for the current filter.
    pub fn reload(&mut self) {
        let ticket = self.issue_ticket();
        self.latest_reload = ticket;
        self.loading = true;
        self.outbox.push(Request::Reload {
            ticket,
            filter: self.filter.clone(),
        });
        self.outbox.push(Request::RefreshStats {
            filter: self.filter.clone(),
        });
    }

    /// Change the filter and reload.
    pub fn update_filter(&mut self, update: impl FnOnce(&mut FilterState)) {
        update(&mut self.filter);
        self.reload();
    }

    /// Replace the product list, keeping the cursor inside it.
    pub fn load(&mut self, page: ProductPage) {
        self.products = page.items;
        self.total = page.total;

        let ids = self.product_ids();
        self.selection.retain_present(&ids);
        if self
            .edit
            .as_ref()
            .is_some_and(|e| !ids.contains(&e.product()))
        {
            self.edit = None;
        }

        self.cursor = self
            .cursor
            .and_then(|c| c.clamped(self.products.len(), self.columns().len()));
        if self.cursor.is_none() {
            self.edit = None;
        }
        self.viewport.clamp(self.products.len());
        if let Some(cell) = self.cursor {
            self.viewport.follow(cell.row);
        }
    }

    /// Record the visible table height from the last draw.
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport.resize(height, self.cursor.map(|c| c.row));
    }

    pub fn set_auto_recalculate(&mut self, enabled: bool) {
        self.settings.auto_recalculate_installments = enabled;
    }

    // ========================================================================
    // Outcomes
    // ========================================================================

    fn is_stale(&self, product: ProductId, field: FieldKey, ticket: Ticket) -> bool {
        self.latest
            .get(&(product, field))
            .is_some_and(|latest| ticket < *latest)
    }

    /// Apply a finished request.
    pub fn apply_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Mutated {
                ticket,
                product,
                mutation,
                result,
            } => {
                if self.pending_out_of_cards.get(&product) == Some(&ticket) {
                    self.pending_out_of_cards.remove(&product);
                    match &result {
                        Ok(_) => {
                            self.queue_mutation(product, Mutation::SetOutOfCards(true));
                        }
                        Err(e) => {
                            tracing::warn!(%product, "rebate failed, out-of-cards not sent: {e}");
                            self.toast
                                .error(format!("{}; out-of-cards not enabled", e.toast_text()));
                            return;
                        }
                    }
                }
                if self.is_stale(product, mutation.field(), ticket) {
                    tracing::warn!(ticket, %product, ?mutation, "discarding stale response");
                    return;
                }
                match result {
                    Ok(row) => self.patch(product, &mutation, row),
                    Err(e) => {
                        tracing::warn!(%product, ?mutation, "mutation failed: {e}");
                        self.toast.error(e.toast_text());
                    }
                }
            }
            Outcome::Painted {
                ticket,
                ids,
                color,
                result,
            } => match result {
                Ok(()) => {
                    for product in self.products.iter_mut().filter(|p| ids.contains(&p.id)) {
                        if !self
                            .latest
                            .get(&(product.id, FieldKey::Color))
                            .is_some_and(|latest| ticket < *latest)
                        {
                            product.color = color;
                        }
                    }
                    self.selection.clear();
                    self.toast
                        .success(format!("{} products painted {color}", ids.len()));
                    self.outbox.push(Request::RefreshStats {
                        filter: self.filter.clone(),
                    });
                }
                Err(e) => {
                    tracing::warn!(count = ids.len(), "batch paint failed: {e}");
                    self.toast.error(e.toast_text());
                }
            },
            Outcome::Reloaded { ticket, result } => {
                if ticket != self.latest_reload {
                    tracing::debug!(ticket, "discarding superseded reload");
                    return;
                }
                self.loading = false;
                match result {
                    Ok(page) => {
                        tracing::info!(rows = page.items.len(), total = page.total, "products loaded");
                        self.load(page);
                    }
                    Err(e) => {
                        tracing::warn!("reload failed: {e}");
                        self.toast.error(e.toast_text());
                    }
                }
            }
            Outcome::Stats(result) => match result {
                Ok(stats) => self.stats = Some(stats),
                Err(e) => tracing::warn!("stats refresh failed: {e}"),
            },
        }
    }

    /// Replace the whole row after a successful mutation.
    fn patch(&mut self, id: ProductId, mutation: &Mutation, row: Option<Product>) {
        let Some(slot) = self.products.iter_mut().find(|p| p.id == id) else {
            tracing::debug!(%id, "patched product is no longer listed");
            return;
        };
        let next = match row {
            Some(row) if row.id == id => row,
            _ => mutation.apply_to(slot),
        };
        let code = next.code.clone();
        *slot = next;
        self.toast.success(mutation.success_message(&code));
    }

    // ========================================================================
    // Keys
    // ========================================================================

    /// Handle a key press.
    ///
    /// Clipboard shortcuts work everywhere, even with a modal open.
    pub fn handle_key(&mut self, key: KeyEvent, ctx: GridContext) -> EventResult {
        if let Some(target) = keys::clipboard_shortcut(&key) {
            self.copy_to_clipboard(target);
            return EventResult::Consumed;
        }
        if ctx.modal_open || ctx.text_input_focused {
            return EventResult::Ignored;
        }
        if self.edit.is_some() {
            return self.handle_edit_key(key);
        }
        let Some(action) = keys::grid_key(&key) else {
            return EventResult::Ignored;
        };

        match action {
            GridKey::SelectAll => {
                let ids = self.product_ids();
                self.selection.select_all(&ids);
                return EventResult::Consumed;
            }
            GridKey::ClearSelection => {
                self.selection.clear();
                return EventResult::Consumed;
            }
            GridKey::CycleView => {
                self.set_view(self.view.next(self.page));
                return EventResult::Consumed;
            }
            GridKey::Cancel => {
                self.clear_cursor();
                return EventResult::Dismissed;
            }
            _ => {}
        }

        let Some(cell) = self.cursor else {
            if action == GridKey::Activate && !self.products.is_empty() {
                self.move_to(ActiveCell::new(0, 0));
                return EventResult::Consumed;
            }
            return EventResult::Ignored;
        };
        self.handle_navigation(cell, action);
        EventResult::Consumed
    }

    fn handle_navigation(&mut self, cell: ActiveCell, action: GridKey) {
        let rows = self.products.len();
        let cols = self.columns().len();

        match action {
            GridKey::Activate => self.begin_edit(cell),
            GridKey::Move(dir, mode) => {
                let next = cell.step(dir, rows, cols);
                if mode == MoveMode::Extend
                    && dir.is_vertical()
                    && next.row != cell.row
                    && let (Some(from), Some(to)) =
                        (self.products.get(cell.row), self.products.get(next.row))
                {
                    let (from, to) = (from.id, to.id);
                    let ids = self.product_ids();
                    self.selection.set_anchor(from);
                    self.selection.toggle(to, true, &ids);
                }
                self.move_to(next);
            }
            GridKey::RowStart => self.move_to(cell.row_start()),
            GridKey::RowEnd => self.move_to(cell.row_end(cols)),
            GridKey::PageUp => self.move_to(cell.page_up()),
            GridKey::PageDown => self.move_to(cell.page_down(rows)),
            GridKey::Paint(color) => self.paint_active(color),
            GridKey::ToggleRebate => self.set_rebate(None),
            GridKey::ToggleWebTransfer => self.toggle_web_transfer(),
            GridKey::ToggleOutOfCards => self.toggle_out_of_cards(),
            GridKey::ToggleSelect { extend } => {
                if let Some(id) = self.active_product().map(|p| p.id) {
                    let ids = self.product_ids();
                    self.selection.toggle(id, extend, &ids);
                }
            }
            GridKey::SelectAll | GridKey::ClearSelection | GridKey::CycleView | GridKey::Cancel => {}
        }
    }

    fn move_to(&mut self, cell: ActiveCell) {
        self.cursor = cell.clamped(self.products.len(), self.columns().len());
        if let Some(cell) = self.cursor {
            self.viewport.follow(cell.row);
        }
    }

    /// Switch the column set. The active column always resets to the first.
    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
        if let Some(cell) = self.cursor.as_mut() {
            cell.col = 0;
        }
    }

    // ========================================================================
    // Edit sessions
    // ========================================================================

    const fn may_edit(&self, field: EditField) -> bool {
        match field {
            EditField::Price(_) | EditField::Installment(..) => self.permissions.edit_prices,
            EditField::Rebate => self.permissions.edit_rebate,
            EditField::WebTransfer => self.permissions.edit_web_transfer,
        }
    }

    fn begin_edit(&mut self, cell: ActiveCell) {
        let Some(column) = self.columns().get(cell.col).copied() else {
            return;
        };
        let Some(field) = column.edit_field() else {
            self.toast
                .info(format!("{} is computed and cannot be edited", column.header()));
            return;
        };
        self.open_session(field);
    }

    fn open_session(&mut self, field: EditField) {
        if !self.may_edit(field) {
            self.toast
                .error(format!("You don't have permission to edit {}", field.label()));
            return;
        }
        let Some(product) = self.active_product() else {
            return;
        };
        let session = EditSession::open(product, field, &self.settings.defaults);
        self.edit = Some(session);
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> EventResult {
        let Some(session) = self.edit.as_mut() else {
            return EventResult::Ignored;
        };
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        match key.code {
            KeyCode::Esc => self.edit = None,
            KeyCode::Tab => session.cycle_focus(false),
            KeyCode::BackTab => session.cycle_focus(true),
            KeyCode::Enter => match session.focused() {
                Focusable::Value | Focusable::Save => self.commit_edit(),
                Focusable::Cancel => self.edit = None,
                Focusable::Preserve => session.toggle_preserve(),
            },
            KeyCode::Char(' ') if session.focused() == Focusable::Preserve => {
                session.toggle_preserve();
            }
            KeyCode::Char(' ') if session.focused() == Focusable::Cancel => self.edit = None,
            KeyCode::Char(' ') if session.focused() == Focusable::Save => self.commit_edit(),
            KeyCode::Char('r') if plain && session.field() == EditField::Rebate => {
                self.edit = None;
                self.set_rebate(Some(false));
            }
            KeyCode::Char(c) if plain => {
                session.push_char(c);
            }
            KeyCode::Backspace => session.backspace(),
            _ => {}
        }
        EventResult::Consumed
    }

    fn commit_edit(&mut self) {
        let Some(session) = self.edit.take() else {
            return;
        };
        match session.commit(self.settings.auto_recalculate_installments) {
            Commit::Send(mutation) => {
                self.queue_mutation(session.product(), mutation);
            }
            Commit::Rejected(e) => {
                tracing::debug!(field = ?session.field(), "rejected input: {e}");
                self.toast.warning(format!("{e}; kept the previous value"));
            }
        }
    }

    // ========================================================================
    // Toggles and color
    // ========================================================================

    /// Flip rebate, or force it to `enabled` when given.
    fn set_rebate(&mut self, enabled: Option<bool>) {
        if !self.permissions.edit_rebate {
            self.toast.error("You don't have permission to change rebate");
            return;
        }
        let Some(product) = self.active_product() else {
            return;
        };
        let id = product.id;
        let mutation = Mutation::SetRebate {
            enabled: enabled.unwrap_or(!product.rebate.enabled),
            percentage: product
                .rebate
                .percentage
                .unwrap_or(self.settings.defaults.rebate_percentage),
        };
        self.queue_mutation(id, mutation);
    }

    fn toggle_web_transfer(&mut self) {
        if !self.permissions.edit_web_transfer {
            self.toast
                .error("You don't have permission to change web transfer");
            return;
        }
        let Some(product) = self.active_product() else {
            return;
        };
        let id = product.id;
        let mutation = Mutation::SetWebTransfer {
            enabled: !product.web_transfer.enabled,
            percentage: product
                .web_transfer
                .percentage
                .unwrap_or(self.settings.defaults.web_transfer_percentage),
            preserve: true,
        };
        self.queue_mutation(id, mutation);
    }

    /// Out-of-cards requires rebate, so enabling it on a product without
    /// rebate turns rebate on first and opens the percentage editor. The
    /// out-of-cards call is only sent once the rebate call has succeeded.
    fn toggle_out_of_cards(&mut self) {
        if !self.permissions.edit_out_of_cards {
            self.toast
                .error("You don't have permission to change out-of-cards");
            return;
        }
        let Some(product) = self.active_product() else {
            return;
        };
        let id = product.id;

        if product.out_of_cards {
            self.queue_mutation(id, Mutation::SetOutOfCards(false));
            return;
        }

        if product.rebate.enabled {
            self.queue_mutation(id, Mutation::SetOutOfCards(true));
            return;
        }

        let percentage = product
            .rebate
            .percentage
            .unwrap_or(self.settings.defaults.rebate_percentage);
        let rebate_ticket = self.queue_mutation(
            id,
            Mutation::SetRebate {
                enabled: true,
                percentage,
            },
        );
        self.pending_out_of_cards.insert(id, rebate_ticket);
        let session = self
            .active_product()
            .map(|p| EditSession::open(p, EditField::Rebate, &self.settings.defaults));
        self.edit = session;
    }

    fn paint_active(&mut self, color: ColorTag) {
        if !self.permissions.edit_colors {
            self.toast.error("You don't have permission to change colors");
            return;
        }
        if let Some(id) = self.active_product().map(|p| p.id) {
            self.queue_mutation(id, Mutation::SetColor(color));
        }
    }

    /// Paint every selected product with one batched call.
    pub fn paint_selection(&mut self, color: ColorTag) {
        if !self.permissions.edit_colors {
            self.toast.error("You don't have permission to change colors");
            return;
        }
        if self.selection.is_empty() {
            self.toast.warning("No products selected");
            return;
        }
        let ids = self.selection.ids();
        let ticket = self.issue_ticket();
        for id in &ids {
            self.latest.insert((*id, FieldKey::Color), ticket);
        }
        self.outbox.push(Request::PaintBatch { ticket, ids, color });
    }

    // ========================================================================
    // Clipboard
    // ========================================================================

    fn copy_to_clipboard(&mut self, target: ClipboardTarget) {
        let product = match self.edit.as_ref() {
            Some(session) => self.product(session.product()),
            None => self.active_product(),
        };
        let Some(product) = product else {
            self.toast.error("Select a product first");
            return;
        };
        if !product.has_code() {
            self.toast.error("This product has no code");
            return;
        }

        let code = product.code.trim();
        let text = match target {
            ClipboardTarget::Code => Some(code.to_string()),
            ClipboardTarget::ListingUrl => fill_url(&self.settings.listing_url, code),
            ClipboardTarget::SearchUrl => fill_url(&self.settings.search_url, code),
        };
        let Some(text) = text else {
            self.toast
                .error(format!("Invalid {} template", target.label()));
            return;
        };

        if self.clipboard.write_text(&text) {
            self.toast.success(format!("Copied {}: {text}", target.label()));
        } else {
            self.toast.error("Clipboard is not available");
        }
    }
}

/// Substitute `{code}` into a URL template, percent-encoding as needed.
fn fill_url(template: &str, code: &str) -> Option<String> {
    reqwest::Url::parse(&template.replace("{code}", code))
        .ok()
        .map(|url| url.to_string())
}
