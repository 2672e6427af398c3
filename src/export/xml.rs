use crate::config::schemes::{ColorScheme, coloured_residues, residue_colour};
use crate::core::distance::is_gap;
use crate::core::{MetadataValue, ResidueRange, ViewState};
use crate::export::table::AlignmentTable;
use crate::export::{ExportError, RegionDefinition};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;

const XML_PROLOGUE: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<?mso-application progid=\"Excel.Sheet\"?>\n";
const SPREADSHEET_NS: &str = "urn:schemas-microsoft-com:office:spreadsheet";
const HEADER_STYLE: &str = "header";

fn residue_style_id(residue: u8) -> String {
    format!("res_{}", char::from(residue.to_ascii_uppercase()))
}

/// Cell payload types understood by spreadsheet readers.
enum CellData<'a> {
    Text(&'a str),
    Number(f64),
}

struct SheetWriter {
    writer: Writer<Vec<u8>>,
}

impl SheetWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 1),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), ExportError> {
        self.writer
            .write_event(event)
            .map_err(|e| ExportError::Xml(e.to_string()))
    }

    fn start(&mut self, tag: &str, attributes: &[(&str, &str)]) -> Result<(), ExportError> {
        let element = BytesStart::new(tag).with_attributes(attributes.iter().copied());
        self.write(Event::Start(element))
    }

    fn empty(&mut self, tag: &str, attributes: &[(&str, &str)]) -> Result<(), ExportError> {
        let element = BytesStart::new(tag).with_attributes(attributes.iter().copied());
        self.write(Event::Empty(element))
    }

    fn end(&mut self, tag: &str) -> Result<(), ExportError> {
        self.write(Event::End(BytesEnd::new(tag)))
    }

    fn cell(&mut self, style: Option<&str>, data: CellData<'_>) -> Result<(), ExportError> {
        match style {
            Some(style) => self.start("Cell", &[("ss:StyleID", style)])?,
            None => self.start("Cell", &[])?,
        }
        let (kind, text) = match data {
            CellData::Text(text) => ("String", text.to_string()),
            CellData::Number(number) => ("Number", number.to_string()),
        };
        self.start("Data", &[("ss:Type", kind)])?;
        self.write(Event::Text(BytesText::new(&text)))?;
        self.end("Data")?;
        self.end("Cell")
    }

    fn finish(self) -> Result<String, ExportError> {
        let body = String::from_utf8(self.writer.into_inner())
            .map_err(|e| ExportError::Xml(e.to_string()))?;
        Ok(format!("{XML_PROLOGUE}{body}\n"))
    }
}

fn write_styles(sheet: &mut SheetWriter, scheme: ColorScheme) -> Result<(), ExportError> {
    sheet.start("Styles", &[])?;

    sheet.start("Style", &[("ss:ID", "Default"), ("ss:Name", "Normal")])?;
    sheet.empty("Font", &[("ss:FontName", "Courier New")])?;
    sheet.end("Style")?;

    sheet.start("Style", &[("ss:ID", HEADER_STYLE)])?;
    sheet.empty("Font", &[("ss:FontName", "Courier New"), ("ss:Bold", "1")])?;
    sheet.end("Style")?;

    for residue in coloured_residues(scheme) {
        let Some(colour) = residue_colour(residue, scheme) else {
            continue;
        };
        let style_id = residue_style_id(residue);
        let hex = colour.hex();
        sheet.start("Style", &[("ss:ID", style_id.as_str())])?;
        sheet.empty("Interior", &[("ss:Color", hex.as_str()), ("ss:Pattern", "Solid")])?;
        sheet.end("Style")?;
    }

    sheet.end("Styles")
}

fn write_alignment_sheet(
    sheet: &mut SheetWriter,
    table: &AlignmentTable,
    scheme: ColorScheme,
) -> Result<(), ExportError> {
    sheet.start("Worksheet", &[("ss:Name", "Alignment")])?;
    sheet.start("Table", &[])?;

    sheet.start("Row", &[])?;
    sheet.cell(Some(HEADER_STYLE), CellData::Text(""))?;
    for column in &table.columns {
        sheet.cell(Some(HEADER_STYLE), CellData::Text(&column.chain))?;
    }
    for _ in &table.residue_labels {
        sheet.cell(Some(HEADER_STYLE), CellData::Text(""))?;
    }
    sheet.end("Row")?;

    sheet.start("Row", &[])?;
    sheet.cell(Some(HEADER_STYLE), CellData::Text("ID"))?;
    for column in &table.columns {
        sheet.cell(Some(HEADER_STYLE), CellData::Text(&column.name))?;
    }
    for label in &table.residue_labels {
        sheet.cell(Some(HEADER_STYLE), CellData::Text(label))?;
    }
    sheet.end("Row")?;

    for row in &table.rows {
        sheet.start("Row", &[])?;
        sheet.cell(None, CellData::Text(&row.id))?;
        for value in &row.values {
            match value {
                Some(MetadataValue::Number(number)) => sheet.cell(None, CellData::Number(*number))?,
                Some(MetadataValue::Text(text)) => sheet.cell(None, CellData::Text(text))?,
                None => sheet.cell(None, CellData::Text(""))?,
            }
        }
        for &residue in &row.residues {
            let style = residue_colour(residue, scheme).map(|_| residue_style_id(residue));
            let text = char::from(residue).to_string();
            sheet.cell(style.as_deref(), CellData::Text(&text))?;
        }
        sheet.end("Row")?;
    }

    sheet.end("Table")?;
    sheet.end("Worksheet")
}

/// Residues of `sequence` inside `range`, with gap characters removed.
fn region_slice(sequence: &[u8], range: ResidueRange) -> String {
    sequence[range.start..=range.stop]
        .iter()
        .copied()
        .filter(|&byte| !is_gap(byte))
        .map(char::from)
        .collect()
}

fn write_regions_sheet(
    sheet: &mut SheetWriter,
    table: &AlignmentTable,
    regions: &[(&RegionDefinition, ResidueRange)],
) -> Result<(), ExportError> {
    sheet.start("Worksheet", &[("ss:Name", "Regions")])?;
    sheet.start("Table", &[])?;

    sheet.start("Row", &[])?;
    sheet.cell(Some(HEADER_STYLE), CellData::Text("ID"))?;
    for (region, _) in regions {
        sheet.cell(Some(HEADER_STYLE), CellData::Text(&region.label))?;
    }
    sheet.end("Row")?;

    for row in &table.rows {
        sheet.start("Row", &[])?;
        sheet.cell(None, CellData::Text(&row.id))?;
        for (_, range) in regions {
            let slice = region_slice(&row.residues, *range);
            sheet.cell(None, CellData::Text(&slice))?;
        }
        sheet.end("Row")?;
    }

    sheet.end("Table")?;
    sheet.end("Worksheet")
}

/// Renders the visible view as a spreadsheet-XML workbook.
///
/// Residue cells are filled with the colour `scheme` gives them. When `regions` is not
/// empty a second worksheet holds each region's residues per sequence.
pub fn export_xml(
    view: &ViewState,
    scheme: ColorScheme,
    regions: &[RegionDefinition],
) -> Result<String, ExportError> {
    let table = AlignmentTable::from_view(view)?;
    let length = view.store().sequence_length();
    let regions = regions
        .iter()
        .map(|region| region.to_range(length).map(|range| (region, range)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut sheet = SheetWriter::new();
    sheet.start(
        "Workbook",
        &[
            ("xmlns", SPREADSHEET_NS),
            ("xmlns:o", "urn:schemas-microsoft-com:office:office"),
            ("xmlns:x", "urn:schemas-microsoft-com:office:excel"),
            ("xmlns:ss", SPREADSHEET_NS),
            ("xmlns:html", "http://www.w3.org/TR/REC-html40"),
        ],
    )?;
    write_styles(&mut sheet, scheme)?;
    write_alignment_sheet(&mut sheet, &table, scheme)?;
    if !regions.is_empty() {
        write_regions_sheet(&mut sheet, &table, &regions)?;
    }
    sheet.end("Workbook")?;

    debug!(
        row_count = table.rows.len(),
        region_count = regions.len(),
        scheme = scheme.name(),
        "exported spreadsheet xml"
    );
    sheet.finish()
}
