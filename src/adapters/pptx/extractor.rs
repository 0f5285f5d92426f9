use super::package::{PptxPackage, Relationship, RT_NOTES_SLIDE, RT_SLIDE, RT_SLIDE_LAYOUT};
use super::PresentationExtractor;
use crate::core::model::{
    Extracted, ImageInfo, ImagePart, Placeholder, Shape, ShapeKind, Slide,
};
use crate::{error::Error, Result};
use infer::Infer;
use roxmltree::{Document, Node};
use std::io::{Read, Seek};
use std::sync::OnceLock;

/// Builds the slide model from the parts of a PresentationML package.
#[derive(Debug, Default, Clone, Copy)]
pub struct PptxExtractor;

impl PresentationExtractor for PptxExtractor {
    fn extract<R: Read + Seek>(&self, package: &mut PptxPackage<R>) -> Result<Vec<Slide>> {
        let main_part = package.main_document_partname()?;
        log::debug!("main presentation part: {}", main_part);

        let xml = package.read_xml_part(&main_part)?;
        let doc = Document::parse(&xml).map_err(|e| Error::xml(&main_part, e))?;
        let rels = package.relationships(&main_part)?;

        let slide_ids: Vec<&str> = child(doc.root_element(), "sldIdLst")
            .map(|list| {
                elements(list, "sldId")
                    .filter_map(|sld_id| rel_attr(sld_id, "id"))
                    .collect()
            })
            .unwrap_or_default();

        let mut slides = Vec::with_capacity(slide_ids.len());
        for (i, rel_id) in slide_ids.into_iter().enumerate() {
            let rel = rels
                .iter()
                .find(|rel| rel.id == rel_id && rel.is(RT_SLIDE))
                .ok_or_else(|| {
                    Error::RelationshipNotFound(format!("{} in {}", rel_id, main_part))
                })?;
            slides.push(self.extract_slide(package, i + 1, &rel.target)?);
        }

        Ok(slides)
    }
}

impl PptxExtractor {
    fn extract_slide<R: Read + Seek>(
        &self,
        package: &mut PptxPackage<R>,
        number: usize,
        partname: &str,
    ) -> Result<Slide> {
        let xml = package.read_xml_part(partname)?;
        let doc = Document::parse(&xml).map_err(|e| Error::xml(partname, e))?;
        let rels = package.relationships(partname)?;

        let mut shapes = Vec::new();
        if let Some(tree) = shape_tree(doc.root_element()) {
            for node in tree.children().filter(Node::is_element) {
                if let Some(shape) = self.extract_shape(package, node, &rels) {
                    shapes.push(shape);
                }
            }
        }

        let title = shapes.iter().position(|shape| {
            shape
                .placeholder
                .as_ref()
                .is_some_and(Placeholder::is_title)
        });

        Ok(Slide {
            number,
            partname: partname.to_string(),
            title,
            layout_name: self.layout_name(package, &rels),
            shapes,
            notes: self.notes_texts(package, &rels),
            related_images: self.related_images(package, &rels),
        })
    }

    /// Returns `None` for elements that are not shapes.
    fn extract_shape<R: Read + Seek>(
        &self,
        package: &mut PptxPackage<R>,
        node: Node,
        rels: &[Relationship],
    ) -> Option<Shape> {
        let element = node.tag_name().name();
        if !matches!(
            element,
            "sp" | "pic" | "graphicFrame" | "grpSp" | "cxnSp" | "contentPart"
        ) {
            return None;
        }

        let nv_props = node
            .children()
            .find(|n| n.is_element() && n.tag_name().name().starts_with("nv"));
        let name = nv_props
            .and_then(|nv| child(nv, "cNvPr"))
            .and_then(|c| c.attribute("name"))
            .unwrap_or_default()
            .to_string();
        let placeholder = nv_props
            .and_then(|nv| child(nv, "nvPr"))
            .and_then(|nv_pr| child(nv_pr, "ph"))
            .map(placeholder_format);

        let mut shape = Shape {
            kind: ShapeKind::Other,
            name,
            placeholder,
            text: None,
            image: None,
        };

        match element {
            "sp" => {
                shape.kind = if shape.placeholder.is_some() {
                    ShapeKind::Placeholder
                } else {
                    autoshape_kind(node)
                };
                shape.text = Some(child(node, "txBody").map(text_frame_text).unwrap_or_default());
            }
            "pic" => {
                let is_media = nv_props
                    .and_then(|nv| child(nv, "nvPr"))
                    .is_some_and(|nv_pr| {
                        nv_pr.descendants().any(|n| {
                            matches!(n.tag_name().name(), "videoFile" | "audioFile" | "media")
                        })
                    });
                if is_media {
                    shape.kind = ShapeKind::Media;
                } else {
                    shape.kind = if shape.placeholder.is_some() {
                        ShapeKind::Placeholder
                    } else {
                        ShapeKind::Picture
                    };
                    shape.image = Some(self.picture_image(package, node, rels));
                }
            }
            "graphicFrame" => {
                shape.kind = if shape.placeholder.is_some() {
                    ShapeKind::Placeholder
                } else {
                    graphic_frame_kind(node)
                };
            }
            "grpSp" => shape.kind = ShapeKind::Group,
            "cxnSp" => shape.kind = ShapeKind::Line,
            "contentPart" => shape.kind = ShapeKind::ContentPart,
            _ => {}
        }

        Some(shape)
    }

    fn picture_image<R: Read + Seek>(
        &self,
        package: &mut PptxPackage<R>,
        pic: Node,
        rels: &[Relationship],
    ) -> Extracted<ImageInfo> {
        let Some(blip) = child(pic, "blipFill").and_then(|fill| child(fill, "blip")) else {
            return Extracted::Malformed("picture has no blip".to_string());
        };
        let Some(rel_id) = rel_attr(blip, "embed") else {
            return match rel_attr(blip, "link") {
                Some(_) => Extracted::Malformed("picture links to an external image".to_string()),
                None => Extracted::Malformed("picture has no image reference".to_string()),
            };
        };
        let Some(rel) = rels.iter().find(|rel| rel.id == rel_id) else {
            return Extracted::Malformed(format!("relationship {} not found", rel_id));
        };
        if rel.external {
            return Extracted::Malformed(format!("image {} is external", rel.target));
        }

        let blob = match package.read_part(&rel.target) {
            Ok(blob) => blob,
            Err(e) => return Extracted::Malformed(e.to_string()),
        };
        let Some(ext) = image_format(&blob) else {
            return Extracted::Malformed(format!(
                "{}: unrecognized image format",
                rel.target
            ));
        };

        Extracted::Present(ImageInfo {
            filename: format!("image.{}", part_ext(&rel.target)),
            size: blob.len() as u64,
            ext: ext.to_string(),
        })
    }

    fn layout_name<R: Read + Seek>(
        &self,
        package: &mut PptxPackage<R>,
        rels: &[Relationship],
    ) -> Extracted<String> {
        let Some(rel) = rels.iter().find(|rel| rel.is(RT_SLIDE_LAYOUT) && !rel.external) else {
            return Extracted::Absent;
        };

        let result = package.read_xml_part(&rel.target).and_then(|xml| {
            let doc = Document::parse(&xml).map_err(|e| Error::xml(&rel.target, e))?;
            Ok(child(doc.root_element(), "cSld")
                .and_then(|c_sld| c_sld.attribute("name"))
                .map(str::to_string))
        });
        result.into()
    }

    fn notes_texts<R: Read + Seek>(
        &self,
        package: &mut PptxPackage<R>,
        rels: &[Relationship],
    ) -> Extracted<Vec<String>> {
        let Some(rel) = rels.iter().find(|rel| rel.is(RT_NOTES_SLIDE) && !rel.external) else {
            return Extracted::Absent;
        };

        let result = package.read_xml_part(&rel.target).and_then(|xml| {
            let doc = Document::parse(&xml).map_err(|e| Error::xml(&rel.target, e))?;
            let texts: Vec<String> = shape_tree(doc.root_element())
                .map(|tree| {
                    elements(tree, "sp")
                        .map(|sp| child(sp, "txBody").map(text_frame_text).unwrap_or_default())
                        .collect()
                })
                .unwrap_or_default();
            Ok(Some(texts))
        });
        result.into()
    }

    fn related_images<R: Read + Seek>(
        &self,
        package: &mut PptxPackage<R>,
        rels: &[Relationship],
    ) -> Vec<ImagePart> {
        let mut images = Vec::new();
        for rel in rels.iter().filter(|rel| !rel.external) {
            let Some(content_type) = package.content_type(&rel.target) else {
                continue;
            };
            if !content_type.starts_with("image/") {
                continue;
            }
            let content_type = content_type.to_string();
            let size = match package.read_part(&rel.target) {
                Ok(blob) => Some(blob.len() as u64),
                Err(e) => {
                    log::warn!("could not read image part {}: {}", rel.target, e);
                    None
                }
            };
            images.push(ImagePart {
                partname: rel.target.clone(),
                content_type,
                size,
            });
        }
        images
    }
}

fn placeholder_format(ph: Node) -> Placeholder {
    let idx = match ph.attribute("idx") {
        None => Extracted::Present(0),
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(idx) => Extracted::Present(idx),
            Err(e) => Extracted::Malformed(format!("placeholder idx {:?}: {}", raw, e)),
        },
    };
    Placeholder { idx }
}

fn autoshape_kind(sp: Node) -> ShapeKind {
    let sp_pr = child(sp, "spPr");
    let is_textbox = child(sp, "nvSpPr")
        .and_then(|nv| child(nv, "cNvSpPr"))
        .and_then(|c| c.attribute("txBox"))
        .is_some_and(|v| v == "1" || v == "true");

    if sp_pr.and_then(|pr| child(pr, "custGeom")).is_some() {
        ShapeKind::Freeform
    } else if is_textbox {
        ShapeKind::TextBox
    } else if sp_pr.and_then(|pr| child(pr, "prstGeom")).is_some() {
        ShapeKind::AutoShape
    } else {
        ShapeKind::Other
    }
}

fn graphic_frame_kind(frame: Node) -> ShapeKind {
    let Some(data) = child(frame, "graphic").and_then(|g| child(g, "graphicData")) else {
        return ShapeKind::Other;
    };
    let uri = data.attribute("uri").unwrap_or_default();
    match uri.rsplit('/').next().unwrap_or_default() {
        "table" => ShapeKind::Table,
        "chart" => ShapeKind::Chart,
        "diagram" => ShapeKind::IgxGraphic,
        "ole" => {
            let linked = data
                .descendants()
                .filter(|n| n.tag_name().name() == "oleObj")
                .any(|ole| child(ole, "link").is_some());
            if linked {
                ShapeKind::LinkedOleObject
            } else {
                ShapeKind::EmbeddedOleObject
            }
        }
        _ => ShapeKind::Other,
    }
}

/// Paragraphs joined by `\n`; `<a:br/>` also yields `\n`.
fn text_frame_text(tx_body: Node) -> String {
    elements(tx_body, "p")
        .map(|p| {
            let mut text = String::new();
            for node in p.children().filter(Node::is_element) {
                match node.tag_name().name() {
                    "r" | "fld" => {
                        if let Some(t) = child(node, "t").and_then(|t| t.text()) {
                            text.push_str(t);
                        }
                    }
                    "br" => text.push('\n'),
                    _ => {}
                }
            }
            text
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn shape_tree<'a, 'i>(root: Node<'a, 'i>) -> Option<Node<'a, 'i>> {
    child(root, "cSld").and_then(|c_sld| child(c_sld, "spTree"))
}

fn child<'a, 'i>(node: Node<'a, 'i>, local: &str) -> Option<Node<'a, 'i>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == local)
}

fn elements<'a, 'i: 'a>(
    node: Node<'a, 'i>,
    local: &'a str,
) -> impl Iterator<Item = Node<'a, 'i>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == local)
}

/// Namespaced attribute such as `r:id` or `r:embed`.
fn rel_attr<'a>(node: Node<'a, '_>, local: &str) -> Option<&'a str> {
    node.attributes()
        .find(|attr| attr.namespace().is_some() && attr.name() == local)
        .map(|attr| attr.value())
}

/// Extension of the last segment of a part name, as written.
fn part_ext(partname: &str) -> &str {
    partname
        .rsplit('/')
        .next()
        .and_then(|file| file.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .unwrap_or_default()
}

/// Picture format from magic bytes; `None` for anything a slide picture
/// cannot be.
fn image_format(blob: &[u8]) -> Option<&'static str> {
    static SNIFFER: OnceLock<Infer> = OnceLock::new();
    let sniffer = SNIFFER.get_or_init(|| {
        let mut sniffer = Infer::new();
        sniffer.add("image/x-wmf", "wmf", is_windows_metafile);
        sniffer
    });

    match sniffer.get(blob)?.extension() {
        "tif" => Some("tiff"),
        ext @ ("bmp" | "gif" | "jpg" | "png" | "wmf") => Some(ext),
        _ => None,
    }
}

/// Placeable WMF header, or an EMF header record.
fn is_windows_metafile(buf: &[u8]) -> bool {
    buf.starts_with(&[0xD7, 0xCD, 0xC6, 0x9A, 0x00, 0x00])
        || (buf.starts_with(&[0x01, 0x00, 0x00, 0x00])
            && buf.get(40..44) == Some(b" EMF".as_slice()))
}
