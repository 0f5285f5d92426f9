//! OPC package access: parts, relationships and content types.

use crate::{error::Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

const CONTENT_TYPES_PART: &str = "/[Content_Types].xml";
const PACKAGE_RELS_SOURCE: &str = "/";

/// Relationship types, matched on the last path segment so that both the
/// transitional and the strict namespaces resolve.
pub const RT_OFFICE_DOCUMENT: &str = "officeDocument";
pub const RT_SLIDE: &str = "slide";
pub const RT_SLIDE_LAYOUT: &str = "slideLayout";
pub const RT_NOTES_SLIDE: &str = "notesSlide";

/// One `<Relationship>` entry of a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    /// Absolute part name for internal targets, the raw URI otherwise.
    pub target: String,
    pub external: bool,
}

impl Relationship {
    pub fn kind(&self) -> &str {
        self.rel_type.rsplit('/').next().unwrap_or_default()
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind() == kind
    }
}

#[derive(Debug, Default)]
struct ContentTypes {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    fn parse(xml: &str) -> Result<Self> {
        let doc =
            roxmltree::Document::parse(xml).map_err(|e| Error::xml(CONTENT_TYPES_PART, e))?;
        let mut types = Self::default();

        for node in doc.root_element().children().filter(|n| n.is_element()) {
            let Some(content_type) = node.attribute("ContentType") else {
                continue;
            };
            match node.tag_name().name() {
                "Default" => {
                    if let Some(ext) = node.attribute("Extension") {
                        types
                            .defaults
                            .insert(ext.to_ascii_lowercase(), content_type.to_string());
                    }
                }
                "Override" => {
                    if let Some(partname) = node.attribute("PartName") {
                        types
                            .overrides
                            .insert(partname.to_ascii_lowercase(), content_type.to_string());
                    }
                }
                _ => {}
            }
        }

        Ok(types)
    }

    fn lookup(&self, partname: &str) -> Option<&str> {
        if let Some(ct) = self.overrides.get(&partname.to_ascii_lowercase()) {
            return Some(ct);
        }
        let ext = partname.rsplit_once('.').map(|(_, ext)| ext)?;
        self.defaults
            .get(&ext.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// A presentation package opened from a file or from memory.
pub struct PptxPackage<R> {
    archive: ZipArchive<R>,
    content_types: ContentTypes,
}

impl PptxPackage<File> {
    /// Opens a package from a file on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<R: Read + Seek> PptxPackage<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)
            .map_err(|e| Error::PptxParse(format!("Failed to open package as ZIP: {}", e)))?;
        let mut package = Self {
            archive,
            content_types: ContentTypes::default(),
        };

        let xml = package.read_xml_part(CONTENT_TYPES_PART)?;
        package.content_types = ContentTypes::parse(&xml)?;
        Ok(package)
    }

    /// Reads the raw bytes of a part.
    pub fn read_part(&mut self, partname: &str) -> Result<Vec<u8>> {
        let entry_name = partname.trim_start_matches('/');
        let mut entry = match self.archive.by_name(entry_name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(Error::PartNotFound(partname.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        // The declared entry size is not trusted for pre-allocation.
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        log::debug!("read part {} ({} bytes)", partname, data.len());
        Ok(data)
    }

    /// Reads a part as UTF-8 XML text.
    pub fn read_xml_part(&mut self, partname: &str) -> Result<String> {
        let data = self.read_part(partname)?;
        let text = String::from_utf8(data).map_err(|e| Error::Xml {
            part: partname.to_string(),
            message: e.to_string(),
        })?;
        Ok(match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        })
    }

    pub fn has_part(&self, partname: &str) -> bool {
        self.archive
            .index_for_name(partname.trim_start_matches('/'))
            .is_some()
    }

    pub fn content_type(&self, partname: &str) -> Option<&str> {
        self.content_types.lookup(partname)
    }

    /// Relationships whose source is `partname`, in document order.
    ///
    /// A part without a `.rels` part has no relationships.
    pub fn relationships(&mut self, partname: &str) -> Result<Vec<Relationship>> {
        let rels_partname = rels_partname_for(partname);
        if !self.has_part(&rels_partname) {
            return Ok(Vec::new());
        }

        let xml = self.read_xml_part(&rels_partname)?;
        let doc = roxmltree::Document::parse(&xml).map_err(|e| Error::xml(&rels_partname, e))?;

        let rels = doc
            .root_element()
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "Relationship")
            .filter_map(|node| {
                let id = node.attribute("Id")?;
                let rel_type = node.attribute("Type").unwrap_or_default();
                let raw_target = node.attribute("Target")?;
                let external = node
                    .attribute("TargetMode")
                    .is_some_and(|mode| mode.eq_ignore_ascii_case("External"));
                let target = if external {
                    raw_target.to_string()
                } else {
                    resolve_partname(partname, raw_target)
                };
                Some(Relationship {
                    id: id.to_string(),
                    rel_type: rel_type.to_string(),
                    target,
                    external,
                })
            })
            .collect();

        Ok(rels)
    }

    /// Part name of the main presentation part.
    pub fn main_document_partname(&mut self) -> Result<String> {
        self.relationships(PACKAGE_RELS_SOURCE)?
            .into_iter()
            .find(|rel| rel.is(RT_OFFICE_DOCUMENT) && !rel.external)
            .map(|rel| rel.target)
            .ok_or_else(|| {
                Error::PptxParse("package has no officeDocument relationship".to_string())
            })
    }
}

/// `/ppt/slides/slide1.xml` -> `/ppt/slides/_rels/slide1.xml.rels`
fn rels_partname_for(partname: &str) -> String {
    if partname == PACKAGE_RELS_SOURCE {
        return "/_rels/.rels".to_string();
    }
    let (dir, file) = partname.rsplit_once('/').unwrap_or(("", partname));
    format!("{}/_rels/{}.rels", dir, file)
}

/// Resolves a relationship target against the part that owns it.
pub fn resolve_partname(source: &str, target: &str) -> String {
    let target = target.split('#').next().unwrap_or_default();
    let mut segments: Vec<&str> = Vec::new();

    if !target.starts_with('/') {
        if let Some((dir, _)) = source.rsplit_once('/') {
            segments.extend(dir.split('/').filter(|s| !s.is_empty()));
        }
    }

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    format!("/{}", segments.join("/"))
}
