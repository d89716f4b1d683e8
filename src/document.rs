//! In-memory spreadsheet document: named worksheet parts plus the shared
//! string and style tables they index into.

use std::ops::{Deref, DerefMut};

use crate::common::{Error, Result};
use crate::map::ResourceMap;
use crate::read::{PageReader, ResourceReadingResult};
use crate::write::{
    CellWriter, SharedStringIndexer, StyleIndexer, XmlElementWriter, write_resources,
};

/// Worksheet parts keyed by page name, in creation order.
#[derive(Debug, Default)]
pub struct Document {
    pages: Vec<(String, String)>,
    strings: SharedStringIndexer,
    styles: StyleIndexer,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load existing worksheet parts and, if present, their shared string table.
    pub fn from_parts<I, N, X>(pages: I, shared_strings_xml: Option<&str>) -> Result<Self>
    where
        I: IntoIterator<Item = (N, X)>,
        N: Into<String>,
        X: Into<String>,
    {
        let mut document = Self {
            strings: match shared_strings_xml {
                Some(xml) => SharedStringIndexer::parse(xml)?,
                None => SharedStringIndexer::new(),
            },
            ..Self::default()
        };
        for (name, xml) in pages {
            let name = name.into();
            document.check_new_page(&name)?;
            document.pages.push((name, xml.into()));
        }
        tracing::debug!(
            pages = document.pages.len(),
            strings = document.strings.len(),
            "document loaded"
        );
        Ok(document)
    }

    /// Start a new page. It becomes part of the document once finished.
    pub fn page_writer(&mut self, name: impl Into<String>) -> Result<PageWriter<'_>> {
        let name = name.into();
        self.check_new_page(&name)?;
        let Document {
            pages,
            strings,
            styles,
        } = self;
        Ok(PageWriter {
            name,
            pages,
            cells: CellWriter::new(XmlElementWriter::new(), styles, strings)?,
        })
    }

    /// Write `resources` on a new page: a header row, then one row each.
    pub fn write_page<'r, T, I>(
        &mut self,
        name: impl Into<String>,
        map: &ResourceMap<T>,
        resources: I,
    ) -> Result<usize>
    where
        T: 'r,
        I: IntoIterator<Item = &'r T>,
    {
        let mut page = self.page_writer(name)?;
        let written = write_resources(&mut page.cells, map, resources)?;
        page.finish()?;
        Ok(written)
    }

    pub fn page_reader(&self, name: &str) -> Result<PageReader<'_>> {
        let xml = self
            .page_xml(name)
            .ok_or_else(|| Error::PageNotFound(name.to_string()))?;
        Ok(PageReader::new(xml, &self.strings))
    }

    /// Read every resource of type `T` from the page `name`.
    pub fn read_all<'a, T>(
        &'a self,
        name: &str,
        map: &'a ResourceMap<T>,
    ) -> Result<ResourceReadingResult<T>> {
        self.page_reader(name)?.read_all(map)
    }

    pub fn page_names(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|(name, _)| name.as_str())
    }

    /// Worksheet XML of the page `name`.
    pub fn page_xml(&self, name: &str) -> Option<&str> {
        self.pages
            .iter()
            .find(|(page, _)| page == name)
            .map(|(_, xml)| xml.as_str())
    }

    pub fn strings(&self) -> &SharedStringIndexer {
        &self.strings
    }

    pub fn styles(&self) -> &StyleIndexer {
        &self.styles
    }

    pub fn shared_strings_xml(&self) -> Result<String> {
        self.strings.to_xml()
    }

    pub fn styles_xml(&self) -> Result<String> {
        self.styles.to_xml()
    }

    fn check_new_page(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument("page names cannot be empty".into()));
        }
        if self.page_xml(name).is_some() {
            return Err(Error::DuplicatePage(name.to_string()));
        }
        Ok(())
    }
}

/// Cell cursor over a page being written. Dereferences to [`CellWriter`].
pub struct PageWriter<'a> {
    name: String,
    pages: &'a mut Vec<(String, String)>,
    cells: CellWriter<'a, XmlElementWriter>,
}

impl PageWriter<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Close the worksheet and add it to the document.
    pub fn finish(mut self) -> Result<()> {
        self.cells.finish()?;
        let xml = self.cells.into_inner()?.into_xml()?;
        tracing::debug!(page = %self.name, bytes = xml.len(), "page finished");
        self.pages.push((self.name, xml));
        Ok(())
    }
}

impl<'a> Deref for PageWriter<'a> {
    type Target = CellWriter<'a, XmlElementWriter>;

    fn deref(&self) -> &Self::Target {
        &self.cells
    }
}

impl DerefMut for PageWriter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cells
    }
}
