//! Style references and the per-document style indexer.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt::Write as FmtWrite;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::format::{
    CellBorder, CellBorderSide, CellFill, CellFillPatternType, CellFont, CellFormat,
};
use crate::common::Result;
use crate::common::xml::escape_xml;

/// A named cell format. The key identifies the style within a document.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRef {
    key: String,
    format: Arc<CellFormat>,
}

impl StyleRef {
    /// Key of the style applied to serial-number date cells by default.
    pub const DATE_KEY: &'static str = "builtin:date";
    /// Key of the style applied to serial-number date-time cells by default.
    pub const DATE_TIME_KEY: &'static str = "builtin:datetime";

    pub fn new(key: impl Into<String>, format: CellFormat) -> Self {
        Self {
            key: key.into(),
            format: Arc::new(format),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn format(&self) -> &CellFormat {
        &self.format
    }

    pub fn date() -> Self {
        Self::new(Self::DATE_KEY, CellFormat::with_number_format("yyyy-mm-dd"))
    }

    pub fn date_time() -> Self {
        Self::new(
            Self::DATE_TIME_KEY,
            CellFormat::with_number_format("yyyy-mm-dd hh:mm:ss"),
        )
    }
}

// Number formats every consumer knows without a numFmt record.
const BUILTIN_NUMBER_FORMATS: &[(&str, usize)] = &[
    ("General", 0),
    ("0", 1),
    ("0.00", 2),
    ("#,##0", 3),
    ("#,##0.00", 4),
    ("0%", 9),
    ("0.00%", 10),
    ("0.00E+00", 11),
    ("mm-dd-yy", 14),
    ("d-mmm-yy", 15),
    ("h:mm", 20),
    ("h:mm:ss", 21),
    ("m/d/yy h:mm", 22),
    ("@", 49),
];

const FIRST_CUSTOM_NUMBER_FORMAT: usize = 164;

/// Look-up-or-insert table of cell formats for one document.
///
/// Styles are registered under their key on first use and keep their index
/// afterwards. Every key gets its own cell format; fonts, fills, borders and
/// number formats are shared between cell formats.
#[derive(Debug)]
pub struct StyleIndexer {
    fonts: Vec<CellFont>,
    font_map: HashMap<u64, usize>,
    fills: Vec<CellFill>,
    fill_map: HashMap<u64, usize>,
    borders: Vec<CellBorder>,
    border_map: HashMap<u64, usize>,
    number_formats: Vec<String>,
    number_format_map: HashMap<String, usize>,
    /// XF records: (font, fill, border, number format)
    cell_formats: Vec<(usize, usize, usize, usize)>,
    keys: HashMap<String, (CellFormat, usize)>,
}

impl StyleIndexer {
    /// Create an indexer holding the records every styles part must start with.
    pub fn new() -> Self {
        let mut indexer = Self {
            fonts: Vec::new(),
            font_map: HashMap::new(),
            fills: Vec::new(),
            fill_map: HashMap::new(),
            borders: Vec::new(),
            border_map: HashMap::new(),
            number_formats: Vec::new(),
            number_format_map: HashMap::new(),
            cell_formats: Vec::new(),
            keys: HashMap::new(),
        };

        indexer.add_font(&CellFont::default());
        // The first two fills are reserved
        indexer.add_fill(&CellFill::pattern(CellFillPatternType::None));
        indexer.add_fill(&CellFill::pattern(CellFillPatternType::Gray125));
        indexer.add_border(&CellBorder::default());
        indexer.cell_formats.push((0, 0, 0, 0));

        indexer
    }

    /// Index of the style `key`, registering `format` under it on first use.
    pub fn add(&mut self, key: &str, format: &CellFormat) -> usize {
        if let Some((_, index)) = self.keys.get(key) {
            return *index;
        }
        let index = self.add_cell_format(format);
        self.keys.insert(key.to_string(), (format.clone(), index));
        tracing::trace!(key, index, "style registered");
        index
    }

    pub fn add_style(&mut self, style: &StyleRef) -> usize {
        self.add(style.key(), style.format())
    }

    /// The format and index registered under `key`.
    pub fn lookup(&self, key: &str) -> Option<(&CellFormat, usize)> {
        self.keys.get(key).map(|(format, index)| (format, *index))
    }

    /// Number of cell formats, the default one included.
    pub fn len(&self) -> usize {
        self.cell_formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell_formats.is_empty()
    }

    fn add_cell_format(&mut self, format: &CellFormat) -> usize {
        let font_id = format.font.as_ref().map_or(0, |font| self.add_font(font));
        let fill_id = format.fill.as_ref().map_or(0, |fill| self.add_fill(fill));
        let border_id = format
            .border
            .as_ref()
            .map_or(0, |border| self.add_border(border));
        let num_fmt_id = format
            .number_format
            .as_deref()
            .map_or(0, |code| self.add_number_format(code));

        // Index 0 stays the unstyled default
        let index = self.cell_formats.len();
        self.cell_formats.push((font_id, fill_id, border_id, num_fmt_id));
        index
    }

    fn add_font(&mut self, font: &CellFont) -> usize {
        let hash = hash_font(font);
        if let Some(&index) = self.font_map.get(&hash) {
            return index;
        }
        let index = self.fonts.len();
        self.fonts.push(font.clone());
        self.font_map.insert(hash, index);
        index
    }

    fn add_fill(&mut self, fill: &CellFill) -> usize {
        let hash = hash_fill(fill);
        if let Some(&index) = self.fill_map.get(&hash) {
            return index;
        }
        let index = self.fills.len();
        self.fills.push(fill.clone());
        self.fill_map.insert(hash, index);
        index
    }

    fn add_border(&mut self, border: &CellBorder) -> usize {
        let hash = hash_border(border);
        if let Some(&index) = self.border_map.get(&hash) {
            return index;
        }
        let index = self.borders.len();
        self.borders.push(border.clone());
        self.border_map.insert(hash, index);
        index
    }

    fn add_number_format(&mut self, code: &str) -> usize {
        if let Some(&(_, id)) = BUILTIN_NUMBER_FORMATS.iter().find(|(c, _)| *c == code) {
            return id;
        }
        if let Some(&id) = self.number_format_map.get(code) {
            return id;
        }
        let id = FIRST_CUSTOM_NUMBER_FORMAT + self.number_formats.len();
        self.number_formats.push(code.to_string());
        self.number_format_map.insert(code.to_string(), id);
        id
    }

    /// Serialize the styles part.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(2048);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !self.number_formats.is_empty() {
            write!(xml, r#"<numFmts count="{}">"#, self.number_formats.len())?;
            for (i, code) in self.number_formats.iter().enumerate() {
                write!(
                    xml,
                    r#"<numFmt numFmtId="{}" formatCode="{}"/>"#,
                    FIRST_CUSTOM_NUMBER_FORMAT + i,
                    escape_xml(code)
                )?;
            }
            xml.push_str("</numFmts>");
        }

        write!(xml, r#"<fonts count="{}">"#, self.fonts.len())?;
        for font in &self.fonts {
            write_font(&mut xml, font)?;
        }
        xml.push_str("</fonts>");

        write!(xml, r#"<fills count="{}">"#, self.fills.len())?;
        for fill in &self.fills {
            write_fill(&mut xml, fill)?;
        }
        xml.push_str("</fills>");

        write!(xml, r#"<borders count="{}">"#, self.borders.len())?;
        for border in &self.borders {
            write_border(&mut xml, border)?;
        }
        xml.push_str("</borders>");

        xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);

        write!(xml, r#"<cellXfs count="{}">"#, self.cell_formats.len())?;
        for (font_id, fill_id, border_id, num_fmt_id) in &self.cell_formats {
            write!(
                xml,
                r#"<xf numFmtId="{}" fontId="{}" fillId="{}" borderId="{}" xfId="0""#,
                num_fmt_id, font_id, fill_id, border_id
            )?;
            if *font_id != 0 {
                xml.push_str(r#" applyFont="1""#);
            }
            if *fill_id != 0 {
                xml.push_str(r#" applyFill="1""#);
            }
            if *border_id != 0 {
                xml.push_str(r#" applyBorder="1""#);
            }
            if *num_fmt_id != 0 {
                xml.push_str(r#" applyNumberFormat="1""#);
            }
            xml.push_str("/>");
        }
        xml.push_str("</cellXfs>");

        xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);
        xml.push_str("</styleSheet>");

        Ok(xml)
    }
}

impl Default for StyleIndexer {
    fn default() -> Self {
        Self::new()
    }
}

fn write_font(xml: &mut String, font: &CellFont) -> Result<()> {
    xml.push_str("<font>");
    if font.bold {
        xml.push_str("<b/>");
    }
    if font.italic {
        xml.push_str("<i/>");
    }
    if font.underline {
        xml.push_str("<u/>");
    }
    write!(xml, r#"<sz val="{}"/>"#, font.size.unwrap_or(11.0))?;
    if let Some(color) = &font.color {
        write!(xml, r#"<color rgb="{}"/>"#, escape_xml(color))?;
    }
    write!(
        xml,
        r#"<name val="{}"/>"#,
        escape_xml(font.name.as_deref().unwrap_or("Calibri"))
    )?;
    xml.push_str("</font>");
    Ok(())
}

fn write_fill(xml: &mut String, fill: &CellFill) -> Result<()> {
    write!(
        xml,
        r#"<fill><patternFill patternType="{}">"#,
        fill.pattern_type.as_str()
    )?;
    if let Some(fg_color) = &fill.fg_color {
        write!(xml, r#"<fgColor rgb="{}"/>"#, escape_xml(fg_color))?;
    }
    if let Some(bg_color) = &fill.bg_color {
        write!(xml, r#"<bgColor rgb="{}"/>"#, escape_xml(bg_color))?;
    }
    xml.push_str("</patternFill></fill>");
    Ok(())
}

fn write_border(xml: &mut String, border: &CellBorder) -> Result<()> {
    xml.push_str("<border>");
    write_border_side(xml, "left", border.left.as_ref())?;
    write_border_side(xml, "right", border.right.as_ref())?;
    write_border_side(xml, "top", border.top.as_ref())?;
    write_border_side(xml, "bottom", border.bottom.as_ref())?;
    xml.push_str("<diagonal/></border>");
    Ok(())
}

fn write_border_side(xml: &mut String, side: &str, border_side: Option<&CellBorderSide>) -> Result<()> {
    match border_side {
        Some(bs) => {
            write!(xml, r#"<{} style="{}">"#, side, bs.style.as_str())?;
            if let Some(color) = &bs.color {
                write!(xml, r#"<color rgb="{}"/>"#, escape_xml(color))?;
            }
            write!(xml, "</{}>", side)?;
        },
        None => write!(xml, "<{}/>", side)?,
    }
    Ok(())
}

fn hash_font(font: &CellFont) -> u64 {
    let mut hasher = DefaultHasher::new();
    font.bold.hash(&mut hasher);
    font.italic.hash(&mut hasher);
    font.underline.hash(&mut hasher);
    font.name.hash(&mut hasher);
    font.size.map(f64::to_bits).hash(&mut hasher);
    font.color.hash(&mut hasher);
    hasher.finish()
}

fn hash_fill(fill: &CellFill) -> u64 {
    let mut hasher = DefaultHasher::new();
    fill.pattern_type.hash(&mut hasher);
    fill.fg_color.hash(&mut hasher);
    fill.bg_color.hash(&mut hasher);
    hasher.finish()
}

fn hash_border(border: &CellBorder) -> u64 {
    let mut hasher = DefaultHasher::new();
    for side in [&border.left, &border.right, &border.top, &border.bottom] {
        match side {
            Some(side) => {
                side.style.hash(&mut hasher);
                side.color.hash(&mut hasher);
            },
            None => 0u8.hash(&mut hasher),
        }
    }
    hasher.finish()
}
