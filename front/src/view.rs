use std::fmt::{self, Write};

use tally_api::v1::Todo;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl StatusFilter {
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => todo.completed,
            StatusFilter::Incomplete => !todo.completed,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// UI state the rendered list is derived from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: StatusFilter,
    pub search: String,
    pub order: SortOrder,
}

impl ListQuery {
    pub fn toggle_order(&mut self) {
        self.order = self.order.toggled();
    }

    /// Filters by status, then by text, then sorts by id. Never touches `todos`.
    pub fn derive(&self, todos: &[Todo]) -> Vec<Todo> {
        let needle = self.search.to_lowercase();

        let mut derived: Vec<_> = todos
            .iter()
            .filter(|todo| self.filter.matches(todo))
            .filter(|todo| todo.text.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        match self.order {
            SortOrder::Asc => derived.sort_by_key(|todo| todo.id),
            SortOrder::Desc => derived.sort_by(|a, b| b.id.cmp(&a.id)),
        }

        derived
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Badge {
    Completed,
    Incomplete,
}

impl Badge {
    pub fn of(todo: &Todo) -> Self {
        match todo.completed {
            true => Badge::Completed,
            false => Badge::Incomplete,
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Badge::Completed => f.write_str("Completed"),
            Badge::Incomplete => f.write_str("Incomplete"),
        }
    }
}

pub const EMPTY_MESSAGE: &str = "No todos found.";

const HEADERS: [&str; 5] = ["ID", "Text", "Status", "User ID", "Actions"];

/// Row actions, carried out through [`crate::page::Page`].
const ACTIONS: &str = "Edit, Delete";

/// Renders rows as a plain text table.
pub fn render_table(rows: &[Todo]) -> String {
    if rows.is_empty() {
        return format!("{}\n", EMPTY_MESSAGE);
    }

    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|todo| {
            [
                todo.id.to_string(),
                todo.text.clone(),
                Badge::of(todo).to_string(),
                todo.user_id.to_string(),
                ACTIONS.to_owned(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut table = String::new();
    write_row(&mut table, &HEADERS, &widths);

    let rule: Vec<_> = widths.iter().map(|width| "-".repeat(*width)).collect();
    write_row(&mut table, &rule, &widths);

    for row in &cells {
        write_row(&mut table, row, &widths);
    }

    table
}

fn write_row(table: &mut String, cells: &[impl AsRef<str>], widths: &[usize]) {
    let line: Vec<_> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = width))
        .collect();

    // writing to a String cannot fail
    let _ = writeln!(table, "{}", line.join(" | ").trim_end());
}
