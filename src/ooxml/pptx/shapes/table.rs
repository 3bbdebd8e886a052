/// Table shape implementation for PowerPoint presentations.
use super::textframe::TextFrame;
use crate::common::xml::Element;
use crate::ooxml::error::Result;

/// A DrawingML table (`a:tbl`) held by a graphic frame.
///
/// # Examples
///
/// ```rust,ignore
/// if let Some(table) = shape.table() {
///     println!("Table: {}x{}", table.row_count(), table.column_count());
///
///     for (row_idx, row) in table.rows().iter().enumerate() {
///         for (col_idx, cell) in row.cells().iter().enumerate() {
///             println!("Cell[{},{}]: {}", row_idx, col_idx, cell.text());
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    element: Element,
    slot: usize,
    rows: Vec<TableRow>,
}

impl Table {
    pub(crate) fn from_element(mut element: Element) -> Self {
        let (slot, rows) = element.detach(|e| e.is("tr"));
        Self {
            element,
            slot,
            rows: rows.into_iter().map(TableRow::from_element).collect(),
        }
    }

    #[inline]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of grid columns (`a:tblGrid/a:gridCol`).
    pub fn column_count(&self) -> usize {
        self.element
            .child("tblGrid")
            .map_or(0, |grid| grid.elements().filter(|c| c.is("gridCol")).count())
    }

    /// Column widths in EMU.
    pub fn column_widths(&self) -> Vec<i64> {
        self.element
            .child("tblGrid")
            .map(|grid| {
                grid.elements()
                    .filter(|c| c.is("gridCol"))
                    .map(|c| c.attr_i64("w").unwrap_or(0))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row)?.cells.get(col)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.rows.get_mut(row)?.cells.get_mut(col)
    }

    pub(crate) fn mark_removed(&mut self) {
        for cell in self.rows.iter_mut().flat_map(|r| r.cells.iter_mut()) {
            cell.frame.mark_removed();
        }
    }

    pub(crate) fn to_element(&self) -> Element {
        let mut element = self.element.clone();
        element.attach(self.slot, self.rows.iter().map(TableRow::to_element));
        element
    }
}

/// A table row (`a:tr`).
#[derive(Debug, Clone)]
pub struct TableRow {
    element: Element,
    slot: usize,
    cells: Vec<TableCell>,
}

impl TableRow {
    fn from_element(mut element: Element) -> Self {
        let (slot, cells) = element.detach(|e| e.is("tc"));
        Self {
            element,
            slot,
            cells: cells.into_iter().map(TableCell::from_element).collect(),
        }
    }

    #[inline]
    pub fn cells(&self) -> &[TableCell] {
        &self.cells
    }

    /// Row height in EMU.
    pub fn height(&self) -> Option<i64> {
        self.element.attr_i64("h")
    }

    fn to_element(&self) -> Element {
        let mut element = self.element.clone();
        element.attach(self.slot, self.cells.iter().map(TableCell::to_element));
        element
    }
}

/// A table cell (`a:tc`) with its own text frame.
#[derive(Debug, Clone)]
pub struct TableCell {
    element: Element,
    slot: usize,
    frame: TextFrame,
}

impl TableCell {
    fn from_element(mut element: Element) -> Self {
        let (slot, mut bodies) = element.detach(|e| e.is("txBody"));
        let (slot, body) = if bodies.is_empty() {
            // txBody comes before tcPr
            (0, TextFrame::empty_cell_body())
        } else {
            (slot, bodies.swap_remove(0))
        };
        Self {
            element,
            slot,
            frame: TextFrame::from_body(body, true, None),
        }
    }

    pub fn text(&self) -> &str {
        self.frame.text()
    }

    pub fn text_frame(&self) -> &TextFrame {
        &self.frame
    }

    pub fn text_frame_mut(&mut self) -> &mut TextFrame {
        &mut self.frame
    }

    /// Replace the cell text. Cells do not autofit.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.frame.replace_text(text, None)
    }

    /// Columns spanned by this cell (`gridSpan`).
    pub fn grid_span(&self) -> u32 {
        self.span("gridSpan")
    }

    /// Rows spanned by this cell (`rowSpan`).
    pub fn row_span(&self) -> u32 {
        self.span("rowSpan")
    }

    /// Whether the cell is covered by a neighbour's span.
    pub fn is_merge_continuation(&self) -> bool {
        self.element.attr_bool("hMerge") == Some(true) || self.element.attr_bool("vMerge") == Some(true)
    }

    /// Whether the cell takes part in a merge, as origin or continuation.
    pub fn is_merged(&self) -> bool {
        self.grid_span() > 1 || self.row_span() > 1 || self.is_merge_continuation()
    }

    fn span(&self, name: &str) -> u32 {
        self.element
            .attr_i64(name)
            .and_then(|v| u32::try_from(v).ok())
            .filter(|&v| v > 0)
            .unwrap_or(1)
    }

    fn to_element(&self) -> Element {
        let mut element = self.element.clone();
        element.attach(self.slot, [self.frame.to_element()]);
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"<a:tbl xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
        <a:tblPr firstRow="1"/>
        <a:tblGrid><a:gridCol w="3048000"/><a:gridCol w="3048000"/></a:tblGrid>
        <a:tr h="370840">
            <a:tc gridSpan="2"><a:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:t>Header</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc>
            <a:tc hMerge="1"><a:txBody><a:bodyPr/><a:lstStyle/><a:p/></a:txBody><a:tcPr/></a:tc>
        </a:tr>
        <a:tr h="370840">
            <a:tc><a:tcPr/></a:tc>
            <a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>B2</a:t></a:r></a:p></a:txBody></a:tc>
        </a:tr>
    </a:tbl>"#;

    fn table() -> Table {
        Table::from_element(Element::parse(TABLE.as_bytes()).unwrap())
    }

    #[test]
    fn test_structure() {
        let table = table();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column_widths(), [3_048_000, 3_048_000]);
        assert_eq!(table.rows()[0].height(), Some(370_840));
        assert_eq!(table.cell(0, 0).unwrap().text(), "Header");
        assert_eq!(table.cell(1, 1).unwrap().text(), "B2");
        assert_eq!(table.cell(1, 0).unwrap().text(), "");
        assert!(table.cell(2, 0).is_none());
    }

    #[test]
    fn test_merges() {
        let table = table();
        let origin = table.cell(0, 0).unwrap();
        assert_eq!(origin.grid_span(), 2);
        assert!(origin.is_merged());
        assert!(!origin.is_merge_continuation());
        assert!(table.cell(0, 1).unwrap().is_merge_continuation());
        assert!(!table.cell(1, 1).unwrap().is_merged());
    }

    #[test]
    fn test_set_cell_text() {
        let mut table = table();
        table.cell_mut(1, 0).unwrap().set_text("filled").unwrap();
        assert_eq!(table.cell(1, 0).unwrap().text(), "filled");

        let element = table.to_element();
        let rows: Vec<_> = element.elements().filter(|e| e.is("tr")).collect();
        assert_eq!(rows.len(), 2);
        let cell = rows[1].elements().next().unwrap();
        let names: Vec<_> = cell.elements().map(Element::local_name).collect();
        assert_eq!(names, ["txBody", "tcPr"]);
        assert_eq!(cell.text(), "filled");
    }

    #[test]
    fn test_removed_table_cells() {
        let mut table = table();
        table.mark_removed();
        assert!(table.cell_mut(0, 0).unwrap().set_text("x").unwrap_err().is_removed());
    }
}
