// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use prodgrid_app::{
    Category, CategoryId, DataResult, PagingSpec, Product, ProductField, SortDirection, SortSpec,
    ViewEvent, ViewState, process,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::time::Duration;

const GRID_COLUMNS: [ProductField; 4] = [
    ProductField::ProductName,
    ProductField::UnitPrice,
    ProductField::UnitsInStock,
    ProductField::Discontinued,
];
const DROPDOWN_PLACEHOLDER: &str = "Product categories";
const SORT_MARK_ASC: &str = "▲";
const SORT_MARK_DESC: &str = "▼";

/// Source of the two read-only collections. Called once before the first
/// frame and again on reload.
pub trait AppRuntime {
    fn load_categories(&mut self) -> Result<Vec<Category>>;
    fn load_products(&mut self) -> Result<Vec<Product>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct DropdownUiState {
    visible: bool,
    cursor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct GridUiState {
    selected_row: usize,
    selected_col: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    categories: Vec<Category>,
    products: Vec<Product>,
    dropdown: DropdownUiState,
    grid: GridUiState,
    help_visible: bool,
    status_line: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GridCommand {
    MoveRow(isize),
    MoveColumn(isize),
    CycleSort,
    ClearSort,
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    OpenDetail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GridStatus {
    SortAsc(&'static str),
    SortDesc(&'static str),
    SortCleared,
    Page { page: usize, pages: usize },
    NoRowSelected,
}

impl GridStatus {
    fn message(self) -> String {
        match self {
            Self::SortAsc(column) => format!("sort {column} asc"),
            Self::SortDesc(column) => format!("sort {column} desc"),
            Self::SortCleared => "sort cleared".to_owned(),
            Self::Page { page, pages } => format!("page {page}/{pages}"),
            Self::NoRowSelected => "no row to open".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GridEvent {
    CursorUpdated,
    DetailOpened,
    Status(GridStatus),
}

pub fn run_app<R: AppRuntime>(state: &mut ViewState, runtime: &mut R) -> Result<()> {
    let mut view_data = ViewData::default();
    refresh_view_data(state, runtime, &mut view_data).context("load catalog")?;

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut result = Ok(());
    loop {
        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(250)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if !has_event {
            continue;
        }
        match event::read().context("read event") {
            Ok(Event::Key(key)) => {
                if handle_key_event(state, runtime, &mut view_data, key) {
                    break;
                }
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn dispatch(state: &mut ViewState, event: ViewEvent) {
    *state = std::mem::take(state).apply(event);
}

fn set_status(view_data: &mut ViewData, message: impl Into<String>) {
    view_data.status_line = Some(message.into());
}

/// Returns `true` when the app should exit.
fn handle_key_event<R: AppRuntime>(
    state: &mut ViewState,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if state.detail_visible {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')
        ) {
            dispatch(state, ViewEvent::DetailClosed);
            set_status(view_data, "details closed");
        }
        return false;
    }

    if view_data.help_visible {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            view_data.help_visible = false;
        }
        return false;
    }

    if view_data.dropdown.visible {
        handle_dropdown_key(state, view_data, key);
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('?') => {
            view_data.help_visible = true;
            return false;
        }
        KeyCode::Char('c') => {
            open_dropdown(state, view_data);
            return false;
        }
        KeyCode::Char('r') => {
            let message = match refresh_view_data(state, runtime, view_data) {
                Ok(()) => format!("reloaded {} products", view_data.products.len()),
                Err(error) => format!("reload failed: {error:#}"),
            };
            set_status(view_data, message);
            return false;
        }
        _ => {}
    }

    let Some(command) = grid_command_for_key(key) else {
        return false;
    };
    match apply_grid_command(state, view_data, command) {
        GridEvent::Status(status) => set_status(view_data, status.message()),
        GridEvent::DetailOpened => set_status(view_data, "details open"),
        GridEvent::CursorUpdated => {}
    }
    false
}

fn dropdown_options(view_data: &ViewData) -> Vec<Option<&Category>> {
    std::iter::once(None)
        .chain(view_data.categories.iter().map(Some))
        .collect()
}

fn open_dropdown(state: &ViewState, view_data: &mut ViewData) {
    let cursor = state
        .selected_category
        .and_then(|selected| {
            view_data
                .categories
                .iter()
                .position(|category| category.id == selected)
        })
        .map_or(0, |index| index + 1);
    view_data.dropdown = DropdownUiState {
        visible: true,
        cursor,
    };
}

fn handle_dropdown_key(state: &mut ViewState, view_data: &mut ViewData, key: KeyEvent) {
    let option_count = view_data.categories.len() + 1;
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            view_data.dropdown.visible = false;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            view_data.dropdown.cursor = (view_data.dropdown.cursor + 1).min(option_count - 1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.dropdown.cursor = view_data.dropdown.cursor.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => {
            view_data.dropdown.cursor = 0;
        }
        KeyCode::Char('G') | KeyCode::End => {
            view_data.dropdown.cursor = option_count - 1;
        }
        KeyCode::Enter => {
            let choice = dropdown_options(view_data)
                .get(view_data.dropdown.cursor)
                .copied()
                .flatten()
                .map(|category| (category.id, category.name.clone()));
            view_data.dropdown.visible = false;
            let chosen_id = choice.as_ref().map(|(id, _)| *id);
            if chosen_id == state.selected_category {
                return;
            }
            dispatch(state, ViewEvent::CategorySelected(chosen_id));
            view_data.grid.selected_row = 0;
            match choice {
                Some((_, name)) => set_status(view_data, format!("category {name}")),
                None => set_status(view_data, "category cleared"),
            }
        }
        _ => {}
    }
}

fn grid_command_for_key(key: KeyEvent) -> Option<GridCommand> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(GridCommand::MoveRow(1)),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(GridCommand::MoveRow(-1)),
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => Some(GridCommand::MoveColumn(-1)),
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => Some(GridCommand::MoveColumn(1)),
        (KeyCode::Char('s'), KeyModifiers::NONE) => Some(GridCommand::CycleSort),
        (KeyCode::Char('S'), _) => Some(GridCommand::ClearSort),
        (KeyCode::Char('n'), KeyModifiers::NONE) | (KeyCode::PageDown, _) => {
            Some(GridCommand::NextPage)
        }
        (KeyCode::Char('p'), KeyModifiers::NONE) | (KeyCode::PageUp, _) => {
            Some(GridCommand::PreviousPage)
        }
        (KeyCode::Home, _) => Some(GridCommand::FirstPage),
        (KeyCode::End, _) => Some(GridCommand::LastPage),
        (KeyCode::Enter, _) => Some(GridCommand::OpenDetail),
        _ => None,
    }
}

fn apply_grid_command(
    state: &mut ViewState,
    view_data: &mut ViewData,
    command: GridCommand,
) -> GridEvent {
    match command {
        GridCommand::MoveRow(delta) => {
            let rows = current_page(state, view_data).data.len();
            view_data.grid.selected_row = step(view_data.grid.selected_row, delta, rows);
            GridEvent::CursorUpdated
        }
        GridCommand::MoveColumn(delta) => {
            view_data.grid.selected_col =
                step(view_data.grid.selected_col, delta, GRID_COLUMNS.len());
            GridEvent::CursorUpdated
        }
        GridCommand::CycleSort => {
            let field = GRID_COLUMNS[view_data.grid.selected_col.min(GRID_COLUMNS.len() - 1)];
            let (paging, status) = cycle_sort(&state.paging, field);
            change_paging(state, view_data, paging);
            GridEvent::Status(status)
        }
        GridCommand::ClearSort => {
            let paging = state.paging.with_sort(Vec::new()).first_page();
            change_paging(state, view_data, paging);
            GridEvent::Status(GridStatus::SortCleared)
        }
        GridCommand::NextPage => {
            let total = current_page(state, view_data).total;
            let paging = state.paging.next_page(total);
            change_paging(state, view_data, paging);
            page_status(state, total)
        }
        GridCommand::PreviousPage => {
            let total = current_page(state, view_data).total;
            let paging = state.paging.previous_page();
            change_paging(state, view_data, paging);
            page_status(state, total)
        }
        GridCommand::FirstPage => {
            let total = current_page(state, view_data).total;
            let paging = state.paging.first_page();
            change_paging(state, view_data, paging);
            page_status(state, total)
        }
        GridCommand::LastPage => {
            let total = current_page(state, view_data).total;
            let paging = state.paging.last_page(total);
            change_paging(state, view_data, paging);
            page_status(state, total)
        }
        GridCommand::OpenDetail => {
            let page = current_page(state, view_data);
            let Some(row) = page.data.get(view_data.grid.selected_row).cloned() else {
                return GridEvent::Status(GridStatus::NoRowSelected);
            };
            dispatch(state, ViewEvent::RowSelected(row));
            GridEvent::DetailOpened
        }
    }
}

fn page_status(state: &ViewState, total: usize) -> GridEvent {
    GridEvent::Status(GridStatus::Page {
        page: state.paging.page_index() + 1,
        pages: state.paging.page_count(total),
    })
}

/// Single-column sort cycle on `field`: none, asc, desc, none. Any sort
/// change goes back to the first page.
fn cycle_sort(paging: &PagingSpec, field: ProductField) -> (PagingSpec, GridStatus) {
    let current = paging
        .sort
        .iter()
        .find(|sort| sort.field == field)
        .map(|sort| sort.direction);
    let (sort, status) = match current {
        None => (vec![SortSpec::asc(field)], GridStatus::SortAsc(field.label())),
        Some(SortDirection::Asc) => (
            vec![SortSpec::desc(field)],
            GridStatus::SortDesc(field.label()),
        ),
        Some(SortDirection::Desc) => (Vec::new(), GridStatus::SortCleared),
    };
    (paging.with_sort(sort).first_page(), status)
}

/// Hands the grid's paging to the controller and keeps the cursor on the page.
fn change_paging(state: &mut ViewState, view_data: &mut ViewData, paging: PagingSpec) {
    if paging == state.paging {
        return;
    }
    let page_moved = paging.skip != state.paging.skip;
    dispatch(state, ViewEvent::PagingChanged(paging));
    if page_moved {
        view_data.grid.selected_row = 0;
    }
    clamp_grid_cursor(state, view_data);
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

fn current_page(state: &ViewState, view_data: &ViewData) -> DataResult<Product> {
    process(&view_data.products, &state.paging)
}

fn clamp_grid_cursor(state: &ViewState, view_data: &mut ViewData) {
    let rows = current_page(state, view_data).data.len();
    view_data.grid.selected_row = view_data.grid.selected_row.min(rows.saturating_sub(1));
    view_data.grid.selected_col = view_data.grid.selected_col.min(GRID_COLUMNS.len() - 1);
}

fn refresh_view_data<R: AppRuntime>(
    state: &mut ViewState,
    runtime: &mut R,
    view_data: &mut ViewData,
) -> Result<()> {
    let categories = runtime.load_categories()?;
    let products = runtime.load_products()?;
    view_data.categories = categories;
    view_data.products = products;

    if let Some(selected) = state.selected_category
        && !view_data
            .categories
            .iter()
            .any(|category| category.id == selected)
    {
        tracing::info!(category = selected.get(), "selected category no longer exists");
        dispatch(state, ViewEvent::CategorySelected(None));
    }

    // Data may have shrunk under the current window.
    let total = current_page(state, view_data).total;
    let clamped = state.paging.clamped(total);
    if clamped != state.paging {
        dispatch(state, ViewEvent::PagingChanged(clamped));
    }
    clamp_grid_cursor(state, view_data);
    Ok(())
}

fn render(frame: &mut ratatui::Frame<'_>, state: &ViewState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(state, view_data)).block(
        Block::default()
            .title("prodgrid")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::White)),
    );
    frame.render_widget(header, layout[0]);

    render_grid(frame, layout[1], state, view_data);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if view_data.dropdown.visible {
        let area = centered_rect(40, 50, frame.area());
        frame.render_widget(Clear, area);
        let dropdown = Paragraph::new(render_dropdown_text(state, view_data)).block(
            Block::default()
                .title(DROPDOWN_PLACEHOLDER)
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(dropdown, area);
    }

    if state.detail_visible
        && let Some(product) = &state.selected_row
    {
        let area = centered_rect(50, 40, frame.area());
        frame.render_widget(Clear, area);
        let detail = Paragraph::new(render_detail_text(product))
            .block(Block::default().title("Product Details").borders(Borders::ALL));
        frame.render_widget(detail, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_grid(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &ViewState,
    view_data: &ViewData,
) {
    let page = current_page(state, view_data);

    let header_cells = GRID_COLUMNS.iter().map(|field| {
        Cell::from(header_label_for_column(*field, &state.paging)).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells);

    let rows = page.data.iter().enumerate().map(|(row_index, product)| {
        let selected_row = row_index == view_data.grid.selected_row;
        let cells = GRID_COLUMNS
            .iter()
            .enumerate()
            .map(|(column_index, field)| {
                let mut style = Style::default();
                if product.discontinued {
                    style = style.fg(Color::DarkGray);
                }
                if selected_row {
                    style = style.bg(Color::DarkGray);
                }
                if selected_row && column_index == view_data.grid.selected_col {
                    style = Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD);
                }
                Cell::from(cell_text(product, *field)).style(style)
            })
            .collect::<Vec<_>>();
        Row::new(cells)
    });

    let widths = [
        Constraint::Min(24),
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Length(14),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(grid_title(&state.paging, page.total))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn header_text(state: &ViewState, view_data: &ViewData) -> String {
    let caption = state
        .selected_category
        .and_then(|selected| category_name(view_data, selected))
        .unwrap_or(DROPDOWN_PLACEHOLDER);
    let selected_id = state
        .selected_category
        .map(|id| id.to_string())
        .unwrap_or_default();
    format!("[{caption} ▾]  Selected category ID: {selected_id}")
}

fn category_name(view_data: &ViewData, id: CategoryId) -> Option<&str> {
    view_data
        .categories
        .iter()
        .find(|category| category.id == id)
        .map(|category| category.name.as_str())
}

fn header_label_for_column(field: ProductField, paging: &PagingSpec) -> String {
    let mut label = field.label().to_owned();
    if let Some(sort) = paging.sort.iter().find(|sort| sort.field == field) {
        label.push(' ');
        label.push_str(match sort.direction {
            SortDirection::Asc => SORT_MARK_ASC,
            SortDirection::Desc => SORT_MARK_DESC,
        });
    }
    label
}

fn grid_title(paging: &PagingSpec, total: usize) -> String {
    let noun = if total == 1 { "item" } else { "items" };
    format!(
        "products | page {}/{} | {total} {noun}",
        paging.page_index() + 1,
        paging.page_count(total)
    )
}

fn cell_text(product: &Product, field: ProductField) -> String {
    match field {
        ProductField::ProductId => product.id.to_string(),
        ProductField::ProductName => product.name.clone(),
        ProductField::CategoryId => product.category_id.to_string(),
        ProductField::QuantityPerUnit => product.quantity_per_unit.clone(),
        ProductField::UnitPrice => format_money(product.unit_price_cents),
        ProductField::UnitsInStock => product.units_in_stock.to_string(),
        ProductField::UnitsOnOrder => product.units_on_order.to_string(),
        ProductField::ReorderLevel => product.reorder_level.to_string(),
        ProductField::Discontinued => {
            if product.discontinued {
                "[x]".to_owned()
            } else {
                "[ ]".to_owned()
            }
        }
    }
}

fn format_money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    let dollars = absolute / 100;
    let cents_component = absolute % 100;
    format!("{sign}${dollars}.{cents_component:02}")
}

fn render_dropdown_text(state: &ViewState, view_data: &ViewData) -> String {
    dropdown_options(view_data)
        .into_iter()
        .enumerate()
        .map(|(index, option)| {
            let cursor = if index == view_data.dropdown.cursor {
                ">"
            } else {
                " "
            };
            let current = option.map(|category| category.id) == state.selected_category;
            let mark = if current { "*" } else { " " };
            let label = option.map_or(DROPDOWN_PLACEHOLDER, |category| category.name.as_str());
            format!("{cursor}{mark} {label}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_detail_text(product: &Product) -> String {
    [
        ProductField::ProductName,
        ProductField::ProductId,
        ProductField::QuantityPerUnit,
    ]
    .into_iter()
    .map(|field| format!("{}\n  {}", field.label(), cell_text(product, field)))
    .collect::<Vec<_>>()
    .join("\n")
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+c quit | q quit | ? help | r reload data\n\
grid: j/k rows | h/l columns | s sort column | S clear sort\n\
grid: n/pgdn next page | p/pgup prev page | home/end first/last page | enter details\n\
categories: c open | j/k move | enter choose | esc close\n\
details: esc/enter close"
}

fn status_text(state: &ViewState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }

    let default = if state.detail_visible {
        "esc close"
    } else if view_data.dropdown.visible {
        "j/k move | enter choose | esc close"
    } else {
        "c category | j/k/h/l | s/S sort | n/p page | enter details | ? help | q quit"
    };
    match &view_data.status_line {
        Some(status) => format!("{status} | {default}"),
        None => default.to_owned(),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, GridCommand, GridEvent, GridStatus, ViewData, apply_grid_command,
        cell_text, current_page, cycle_sort, format_money, grid_command_for_key, grid_title,
        handle_key_event, header_label_for_column, header_text, refresh_view_data,
        render_detail_text, render_dropdown_text, status_text,
    };
    use anyhow::Result;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use prodgrid_app::{
        Category, CategoryId, CompositeFilter, PagingSpec, Product, ProductField, ProductId,
        SortSpec, ViewState,
    };
    use prodgrid_testkit::{sample_categories, sample_products};

    #[derive(Debug, Default)]
    struct TestRuntime {
        categories: Vec<Category>,
        products: Vec<Product>,
        load_count: usize,
        products_unreadable: bool,
    }

    impl TestRuntime {
        fn with_fixtures() -> Self {
            Self {
                categories: sample_categories(),
                products: sample_products(),
                load_count: 0,
                products_unreadable: false,
            }
        }
    }

    impl AppRuntime for TestRuntime {
        fn load_categories(&mut self) -> Result<Vec<Category>> {
            self.load_count += 1;
            Ok(self.categories.clone())
        }

        fn load_products(&mut self) -> Result<Vec<Product>> {
            if self.products_unreadable {
                anyhow::bail!("products unreadable");
            }
            Ok(self.products.clone())
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(
        state: &mut ViewState,
        runtime: &mut TestRuntime,
        view_data: &mut ViewData,
        codes: &[KeyCode],
    ) -> bool {
        let mut quit = false;
        for code in codes {
            quit = handle_key_event(state, runtime, view_data, key(*code));
        }
        quit
    }

    fn loaded() -> Result<(ViewState, TestRuntime, ViewData)> {
        let mut state = ViewState::default();
        let mut runtime = TestRuntime::with_fixtures();
        let mut view_data = ViewData::default();
        refresh_view_data(&mut state, &mut runtime, &mut view_data)?;
        Ok((state, runtime, view_data))
    }

    fn page_names(state: &ViewState, view_data: &ViewData) -> Vec<String> {
        current_page(state, view_data)
            .data
            .into_iter()
            .map(|product| product.name)
            .collect()
    }

    #[test]
    fn first_page_is_sorted_by_name() -> Result<()> {
        let (state, _runtime, view_data) = loaded()?;
        let names = page_names(&state, &view_data);
        assert_eq!(names.len(), 10);
        assert_eq!(names[0], "Aniseed Syrup");
        assert_eq!(names[1], "Carnarvon Tigers");
        assert_eq!(
            grid_title(&state.paging, current_page(&state, &view_data).total),
            "products | page 1/2 | 14 items"
        );
        Ok(())
    }

    #[test]
    fn dropdown_selection_filters_grid_and_resets_page() -> Result<()> {
        let (mut state, mut runtime, mut view_data) = loaded()?;
        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('n')]);
        assert_eq!(state.paging.skip, 10);

        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Char('c'), KeyCode::Char('j'), KeyCode::Enter],
        );
        assert!(!view_data.dropdown.visible);
        assert_eq!(state.selected_category, Some(CategoryId::new(1)));
        assert_eq!(state.paging.skip, 0);
        assert_eq!(
            state.paging.filter,
            Some(CompositeFilter::category(CategoryId::new(1)))
        );
        assert_eq!(
            page_names(&state, &view_data),
            vec!["Chai", "Chang", "Guaraná Fantástica", "Sasquatch Ale"]
        );
        assert_eq!(
            header_text(&state, &view_data),
            "[Beverages ▾]  Selected category ID: 1"
        );
        assert_eq!(view_data.status_line.as_deref(), Some("category Beverages"));
        Ok(())
    }

    #[test]
    fn choosing_placeholder_clears_category() -> Result<()> {
        let (mut state, mut runtime, mut view_data) = loaded()?;
        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Char('c'), KeyCode::Char('G'), KeyCode::Enter],
        );
        assert_eq!(state.selected_category, Some(CategoryId::new(8)));

        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('c')]);
        assert_eq!(view_data.dropdown.cursor, 4);
        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Char('g'), KeyCode::Enter],
        );
        assert_eq!(state.selected_category, None);
        assert_eq!(state.paging.filter, None);
        assert_eq!(current_page(&state, &view_data).total, 14);
        assert_eq!(
            header_text(&state, &view_data),
            "[Product categories ▾]  Selected category ID: "
        );
        Ok(())
    }

    #[test]
    fn escape_closes_dropdown_without_selecting() -> Result<()> {
        let (mut state, mut runtime, mut view_data) = loaded()?;
        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Char('c'), KeyCode::Down, KeyCode::Esc],
        );
        assert!(!view_data.dropdown.visible);
        assert_eq!(state, ViewState::default());
        Ok(())
    }

    #[test]
    fn dropdown_text_marks_cursor_and_current_choice() -> Result<()> {
        let (mut state, mut runtime, mut view_data) = loaded()?;
        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Char('c'), KeyCode::Down, KeyCode::Down],
        );
        let text = render_dropdown_text(&state, &view_data);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], " * Product categories");
        assert_eq!(lines[2], ">  Condiments");
        assert_eq!(lines.len(), 5);
        Ok(())
    }

    #[test]
    fn enter_opens_detail_for_selected_row_and_escape_closes() -> Result<()> {
        let (mut state, mut runtime, mut view_data) = loaded()?;
        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Char('j'), KeyCode::Enter],
        );
        assert!(state.detail_visible);
        let row = state.selected_row.clone().expect("selected row");
        assert_eq!(row.name, "Carnarvon Tigers");
        assert_eq!(
            render_detail_text(&row),
            "Product Name\n  Carnarvon Tigers\nProduct ID\n  18\nQuantity per Unit\n  16 kg pkg."
        );

        // Grid keys are inert while the detail is up.
        let paging = state.paging.clone();
        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('n')]);
        assert_eq!(state.paging, paging);

        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Esc]);
        assert!(!state.detail_visible);
        assert_eq!(state.selected_row, None);
        Ok(())
    }

    #[test]
    fn row_click_scenario_for_product_seven() -> Result<()> {
        let (mut state, mut runtime, mut view_data) = loaded()?;
        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Char('c'), KeyCode::Char('j'), KeyCode::Char('j'), KeyCode::Char('j')],
        );
        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Enter]);
        assert_eq!(state.selected_category, Some(CategoryId::new(7)));

        let names = page_names(&state, &view_data);
        let index = names
            .iter()
            .position(|name| name == "Uncle Bob's Organic Dried Pears")
            .expect("pears on page");
        for _ in 0..index {
            press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Down]);
        }
        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Enter]);
        assert!(state.detail_visible);
        assert_eq!(
            state.selected_row.as_ref().map(|row| row.id),
            Some(ProductId::new(7))
        );

        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Esc]);
        assert!(!state.detail_visible);
        Ok(())
    }

    #[test]
    fn paging_keys_walk_pages_within_bounds() -> Result<()> {
        let (mut state, mut runtime, mut view_data) = loaded()?;
        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::PageDown]);
        assert_eq!(state.paging.skip, 10);
        assert_eq!(page_names(&state, &view_data).len(), 4);
        assert_eq!(view_data.status_line.as_deref(), Some("page 2/2"));

        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('n')]);
        assert_eq!(state.paging.skip, 10);

        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('p')]);
        assert_eq!(state.paging.skip, 0);
        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::End]);
        assert_eq!(state.paging.skip, 10);
        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Home]);
        assert_eq!(state.paging.skip, 0);
        Ok(())
    }

    #[test]
    fn page_change_resets_row_cursor() -> Result<()> {
        let (mut state, mut runtime, mut view_data) = loaded()?;
        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Char('j'), KeyCode::Char('j'), KeyCode::Char('j')],
        );
        assert_eq!(view_data.grid.selected_row, 3);
        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('n')]);
        assert_eq!(view_data.grid.selected_row, 0);
        Ok(())
    }

    #[test]
    fn row_cursor_stops_at_page_edges() -> Result<()> {
        let (mut state, mut runtime, mut view_data) = loaded()?;
        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('k')]);
        assert_eq!(view_data.grid.selected_row, 0);
        for _ in 0..20 {
            press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('j')]);
        }
        assert_eq!(view_data.grid.selected_row, 9);
        Ok(())
    }

    #[test]
    fn sort_cycles_asc_desc_none_on_focused_column() -> Result<()> {
        let (mut state, _runtime, mut view_data) = loaded()?;
        view_data.grid.selected_col = 1;

        let event = apply_grid_command(&mut state, &mut view_data, GridCommand::CycleSort);
        assert_eq!(event, GridEvent::Status(GridStatus::SortAsc("Price")));
        assert_eq!(state.paging.sort, vec![SortSpec::asc(ProductField::UnitPrice)]);
        assert_eq!(page_names(&state, &view_data)[0], "Guaraná Fantástica");

        let event = apply_grid_command(&mut state, &mut view_data, GridCommand::CycleSort);
        assert_eq!(event, GridEvent::Status(GridStatus::SortDesc("Price")));
        assert_eq!(page_names(&state, &view_data)[0], "Carnarvon Tigers");

        let event = apply_grid_command(&mut state, &mut view_data, GridCommand::CycleSort);
        assert_eq!(event, GridEvent::Status(GridStatus::SortCleared));
        assert!(state.paging.sort.is_empty());
        assert_eq!(page_names(&state, &view_data)[0], "Chai");
        Ok(())
    }

    #[test]
    fn sort_change_returns_to_first_page() {
        let paging = PagingSpec::default().with_skip(20);
        let (next, _) = cycle_sort(&paging, ProductField::UnitsInStock);
        assert_eq!(next.skip, 0);
        assert_eq!(next.sort, vec![SortSpec::asc(ProductField::UnitsInStock)]);
        assert_eq!(next.take, paging.take);
    }

    #[test]
    fn clear_sort_key_drops_every_sort() -> Result<()> {
        let (mut state, mut runtime, mut view_data) = loaded()?;
        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('S')]);
        assert!(state.paging.sort.is_empty());
        assert_eq!(view_data.status_line.as_deref(), Some("sort cleared"));
        Ok(())
    }

    #[test]
    fn header_labels_mark_sorted_column() {
        let paging = PagingSpec::default();
        assert_eq!(
            header_label_for_column(ProductField::ProductName, &paging),
            "Product Name ▲"
        );
        assert_eq!(
            header_label_for_column(ProductField::UnitPrice, &paging),
            "Price"
        );
        let desc = paging.with_sort(vec![SortSpec::desc(ProductField::UnitsInStock)]);
        assert_eq!(
            header_label_for_column(ProductField::UnitsInStock, &desc),
            "Units in Stock ▼"
        );
    }

    #[test]
    fn cells_format_money_and_checkbox() {
        let products = sample_products();
        let gumbo = &products[4];
        assert_eq!(cell_text(gumbo, ProductField::UnitPrice), "$21.35");
        assert_eq!(cell_text(gumbo, ProductField::Discontinued), "[x]");
        assert_eq!(cell_text(&products[0], ProductField::Discontinued), "[ ]");
        assert_eq!(format_money(5), "$0.05");
        assert_eq!(format_money(-1250), "-$12.50");
    }

    #[test]
    fn reload_clamps_window_when_data_shrinks() -> Result<()> {
        let (mut state, mut runtime, mut view_data) = loaded()?;
        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('n')]);
        assert_eq!(state.paging.skip, 10);

        runtime.products.truncate(6);
        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('r')]);
        assert_eq!(runtime.load_count, 2);
        assert_eq!(state.paging.skip, 0);
        assert_eq!(page_names(&state, &view_data).len(), 6);
        assert_eq!(view_data.status_line.as_deref(), Some("reloaded 6 products"));
        Ok(())
    }

    #[test]
    fn reload_drops_category_that_disappeared() -> Result<()> {
        let (mut state, mut runtime, mut view_data) = loaded()?;
        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Char('c'), KeyCode::Char('G'), KeyCode::Enter],
        );
        assert_eq!(state.selected_category, Some(CategoryId::new(8)));

        runtime
            .categories
            .retain(|category| category.id != CategoryId::new(8));
        runtime
            .products
            .retain(|product| product.category_id != CategoryId::new(8));
        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('r')]);
        assert_eq!(state.selected_category, None);
        assert_eq!(state.paging.filter, None);
        Ok(())
    }

    #[test]
    fn failed_reload_keeps_previous_catalog() -> Result<()> {
        let (mut state, mut runtime, mut view_data) = loaded()?;
        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Char('c'), KeyCode::Char('G'), KeyCode::Enter],
        );
        assert_eq!(state.selected_category, Some(CategoryId::new(8)));
        let categories_before = view_data.categories.clone();
        let products_before = view_data.products.clone();

        runtime
            .categories
            .retain(|category| category.id != CategoryId::new(8));
        runtime.products_unreadable = true;
        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('r')]);

        assert_eq!(
            view_data.status_line.as_deref(),
            Some("reload failed: products unreadable")
        );
        assert_eq!(view_data.categories, categories_before);
        assert_eq!(view_data.products, products_before);
        assert_eq!(state.selected_category, Some(CategoryId::new(8)));
        assert!(header_text(&state, &view_data).contains("Seafood"));
        Ok(())
    }

    #[test]
    fn reselecting_current_category_keeps_page() -> Result<()> {
        let (mut state, mut runtime, mut view_data) = loaded()?;
        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('n')]);
        assert_eq!(state.paging.skip, 10);

        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Char('c'), KeyCode::Enter],
        );
        assert!(!view_data.dropdown.visible);
        assert_eq!(state.selected_category, None);
        assert_eq!(state.paging.skip, 10);
        Ok(())
    }

    #[test]
    fn open_detail_on_empty_page_reports_status() {
        let mut state = ViewState::default();
        let mut view_data = ViewData::default();
        let event = apply_grid_command(&mut state, &mut view_data, GridCommand::OpenDetail);
        assert_eq!(event, GridEvent::Status(GridStatus::NoRowSelected));
        assert!(!state.detail_visible);
    }

    #[test]
    fn help_overlay_toggles_and_hides_status() -> Result<()> {
        let (mut state, mut runtime, mut view_data) = loaded()?;
        press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('?')]);
        assert!(view_data.help_visible);
        assert_eq!(status_text(&state, &view_data), "");

        // q closes help instead of quitting.
        let quit = press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('q')]);
        assert!(!quit);
        assert!(!view_data.help_visible);
        Ok(())
    }

    #[test]
    fn quit_keys() -> Result<()> {
        let (mut state, mut runtime, mut view_data) = loaded()?;
        assert!(press(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('q')]));
        assert!(handle_key_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ));
        Ok(())
    }

    #[test]
    fn key_mapping_covers_paging_and_sort() {
        assert_eq!(
            grid_command_for_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE)),
            Some(GridCommand::CycleSort)
        );
        assert_eq!(
            grid_command_for_key(KeyEvent::new(KeyCode::PageUp, KeyModifiers::NONE)),
            Some(GridCommand::PreviousPage)
        );
        assert_eq!(
            grid_command_for_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)),
            None
        );
    }
}
