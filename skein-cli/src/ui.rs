use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

/// Table with a header row, for method listings.
pub fn data_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(headers);
    table
}

/// Borderless key-value card.
pub fn info_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn cell(content: impl ToString) -> Cell {
    Cell::new(content)
}

pub fn cell_bold(content: impl ToString) -> Cell {
    Cell::new(content).add_attribute(Attribute::Bold)
}

pub fn cell_dim(content: impl ToString) -> Cell {
    Cell::new(content).fg(Color::DarkGrey)
}

pub fn cell_right(content: impl ToString) -> Cell {
    Cell::new(content).set_alignment(CellAlignment::Right)
}

/// Print with a 2-space left indent.
pub fn print_table(table: &Table) {
    for line in table.lines() {
        println!("  {}", line);
    }
}
