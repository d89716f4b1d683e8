//! Cell format value objects referenced by header and body styles.

/// Formatting of a cell: font, fill, border and number format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellFormat {
    pub font: Option<CellFont>,
    pub fill: Option<CellFill>,
    pub border: Option<CellBorder>,
    pub number_format: Option<String>,
}

impl CellFormat {
    /// Format carrying only a number format code.
    pub fn with_number_format(code: impl Into<String>) -> Self {
        Self {
            number_format: Some(code.into()),
            ..Default::default()
        }
    }

    /// Format carrying only a bold default font, the usual header look.
    pub fn bold() -> Self {
        Self {
            font: Some(CellFont {
                bold: true,
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellFont {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// ARGB hex, e.g. `FF0000FF`
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellFill {
    pub pattern_type: CellFillPatternType,
    pub fg_color: Option<String>,
    pub bg_color: Option<String>,
}

impl CellFill {
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            pattern_type: CellFillPatternType::Solid,
            fg_color: Some(color.into()),
            bg_color: None,
        }
    }

    pub(crate) fn pattern(pattern_type: CellFillPatternType) -> Self {
        Self {
            pattern_type,
            fg_color: None,
            bg_color: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellFillPatternType {
    None,
    Solid,
    Gray125,
    DarkGray,
    MediumGray,
    LightGray,
    Gray0625,
}

impl CellFillPatternType {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Solid => "solid",
            Self::Gray125 => "gray125",
            Self::DarkGray => "darkGray",
            Self::MediumGray => "mediumGray",
            Self::LightGray => "lightGray",
            Self::Gray0625 => "gray0625",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellBorder {
    pub left: Option<CellBorderSide>,
    pub right: Option<CellBorderSide>,
    pub top: Option<CellBorderSide>,
    pub bottom: Option<CellBorderSide>,
}

impl CellBorder {
    /// The same side on all four edges.
    pub fn all(side: CellBorderSide) -> Self {
        Self {
            left: Some(side.clone()),
            right: Some(side.clone()),
            top: Some(side.clone()),
            bottom: Some(side),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellBorderSide {
    pub style: CellBorderLineStyle,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellBorderLineStyle {
    Thin,
    Medium,
    Dashed,
    Dotted,
    Thick,
    Double,
    Hair,
}

impl CellBorderLineStyle {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Thin => "thin",
            Self::Medium => "medium",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::Thick => "thick",
            Self::Double => "double",
            Self::Hair => "hair",
        }
    }
}
