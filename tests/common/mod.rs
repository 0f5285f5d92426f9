#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const PPTX_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
pub const POTX_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml";

const NS_DECL: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const RT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// A 1x1 RGBA PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR\x00\x00\x00\x01\x00\x00\x00\x01\x08\x06\x00\x00\x00\x1f\x15\xc4\x89\x00\x00\x00\x0dIDAT\x78\xda\x63\x64\x60\xf8\x5f\x0f\x00\x02\x87\x01\x80\xeb\x47\xba\x92\x00\x00\x00\x00IEND\xae\x42\x60\x82";

#[derive(Debug, Clone, Default)]
pub struct SlideFixture {
    pub shapes: Vec<String>,
    pub layout: Option<String>,
    pub notes: Option<Vec<String>>,
    /// `(id, relationship type suffix, target relative to the slide)`
    pub rels: Vec<(String, String, String)>,
}

impl SlideFixture {
    pub fn new(shapes: Vec<String>) -> Self {
        Self {
            shapes,
            ..Default::default()
        }
    }

    pub fn layout(mut self, name: &str) -> Self {
        self.layout = Some(name.to_string());
        self
    }

    pub fn notes(mut self, notes: &[&str]) -> Self {
        self.notes = Some(notes.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn image_rel(mut self, id: &str, target: &str) -> Self {
        self.rels
            .push((id.to_string(), "image".to_string(), target.to_string()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct PptxBuilder {
    main_content_type: &'static str,
    slides: Vec<SlideFixture>,
    media: Vec<(String, Vec<u8>)>,
    overrides: Vec<(String, Vec<u8>)>,
}

impl Default for PptxBuilder {
    fn default() -> Self {
        Self {
            main_content_type: PPTX_MAIN,
            slides: Vec::new(),
            media: Vec::new(),
            overrides: Vec::new(),
        }
    }
}

impl PptxBuilder {
    pub fn template(mut self) -> Self {
        self.main_content_type = POTX_MAIN;
        self
    }

    pub fn slide(mut self, slide: SlideFixture) -> Self {
        self.slides.push(slide);
        self
    }

    /// Adds `ppt/media/<name>`.
    pub fn media(mut self, name: &str, bytes: &[u8]) -> Self {
        self.media.push((format!("ppt/media/{}", name), bytes.to_vec()));
        self
    }

    /// Replaces a generated entry with raw bytes.
    pub fn raw_part(mut self, name: &str, bytes: &[u8]) -> Self {
        self.overrides.push((name.to_string(), bytes.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut parts: Vec<(String, Vec<u8>)> = Vec::new();
        let mut content_overrides = vec![format!(
            r#"<Override PartName="/ppt/presentation.xml" ContentType="{}"/>"#,
            self.main_content_type
        )];

        parts.push((
            "_rels/.rels".to_string(),
            rels_xml(&[(
                "rId1".to_string(),
                "officeDocument".to_string(),
                "ppt/presentation.xml".to_string(),
            )])
            .into_bytes(),
        ));

        let mut sld_ids = String::new();
        let mut pres_rels = Vec::new();
        for (i, slide) in self.slides.iter().enumerate() {
            let n = i + 1;
            sld_ids.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + n, n));
            pres_rels.push((
                format!("rId{}", n),
                "slide".to_string(),
                format!("slides/slide{}.xml", n),
            ));

            parts.push((
                format!("ppt/slides/slide{}.xml", n),
                slide_xml("sld", &slide.shapes.concat()).into_bytes(),
            ));
            content_overrides.push(format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                n
            ));

            let mut slide_rels = Vec::new();
            if let Some(layout) = &slide.layout {
                slide_rels.push((
                    "rId1".to_string(),
                    "slideLayout".to_string(),
                    format!("../slideLayouts/slideLayout{}.xml", n),
                ));
                parts.push((
                    format!("ppt/slideLayouts/slideLayout{}.xml", n),
                    format!(
                        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout {}><p:cSld name="{}"><p:spTree/></p:cSld></p:sldLayout>"#,
                        NS_DECL, layout
                    )
                    .into_bytes(),
                ));
            }
            if let Some(notes) = &slide.notes {
                slide_rels.push((
                    "rId2".to_string(),
                    "notesSlide".to_string(),
                    format!("../notesSlides/notesSlide{}.xml", n),
                ));
                let mut shapes = String::from(
                    r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/><p:cNvSpPr/><p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#,
                );
                for (j, note) in notes.iter().enumerate() {
                    shapes.push_str(&placeholder_sp(
                        j as u32 + 3,
                        "Notes Placeholder",
                        "body",
                        1,
                        note,
                    ));
                }
                parts.push((
                    format!("ppt/notesSlides/notesSlide{}.xml", n),
                    slide_xml("notes", &shapes).into_bytes(),
                ));
            }
            slide_rels.extend(slide.rels.iter().cloned());
            if !slide_rels.is_empty() {
                parts.push((
                    format!("ppt/slides/_rels/slide{}.xml.rels", n),
                    rels_xml(&slide_rels).into_bytes(),
                ));
            }
        }

        parts.push((
            "ppt/presentation.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {}><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#,
                NS_DECL, sld_ids
            )
            .into_bytes(),
        ));
        parts.push((
            "ppt/_rels/presentation.xml.rels".to_string(),
            rels_xml(&pres_rels).into_bytes(),
        ));
        parts.extend(self.media.iter().cloned());

        let content_types = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Default Extension="jpeg" ContentType="image/jpeg"/>{}</Types>"#,
            content_overrides.concat()
        );
        parts.insert(0, ("[Content_Types].xml".to_string(), content_types.into_bytes()));

        for (name, bytes) in &self.overrides {
            match parts.iter_mut().find(|(existing, _)| existing == name) {
                Some(part) => part.1 = bytes.clone(),
                None => parts.push((name.clone(), bytes.clone())),
            }
        }

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in parts {
            zip.start_file(name, SimpleFileOptions::default())
                .expect("start zip entry");
            zip.write_all(&bytes).expect("write zip entry");
        }
        zip.finish().expect("finish zip").into_inner()
    }

    pub fn write_to(&self, path: &Path) -> PathBuf {
        std::fs::write(path, self.build()).expect("write fixture");
        path.to_path_buf()
    }
}

fn rels_xml(rels: &[(String, String, String)]) -> String {
    let entries: String = rels
        .iter()
        .map(|(id, kind, target)| {
            format!(
                r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
                id, RT, kind, target
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        entries
    )
}

fn slide_xml(root: &str, shapes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:{root} {ns}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld></p:{root}>"#,
        root = root,
        ns = NS_DECL,
        shapes = shapes
    )
}

fn paragraphs(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", line))
        .collect()
}

fn placeholder_sp(id: u32, name: &str, ph_type: &str, idx: u32, text: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr/><p:nvPr><p:ph type="{}" idx="{}"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/>{}</p:txBody></p:sp>"#,
        id,
        name,
        ph_type,
        idx,
        paragraphs(text)
    )
}

/// A placeholder `p:sp` with explicit `type` and `idx`.
pub fn placeholder(ph_type: &str, idx: u32, text: &str) -> String {
    placeholder_sp(60 + idx, "Placeholder", ph_type, idx, text)
}

/// A placeholder `p:sp` whose `p:ph` carries no attributes.
pub fn bare_placeholder(text: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="70" name="Placeholder"/><p:cNvSpPr/><p:nvPr><p:ph/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/>{}</p:txBody></p:sp>"#,
        paragraphs(text)
    )
}

pub fn title(text: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/>{}</p:txBody></p:sp>"#,
        paragraphs(text)
    )
}

pub fn body(idx: u32, text: &str) -> String {
    placeholder_sp(10 + idx, "Content Placeholder", "body", idx, text)
}

pub fn text_box(text: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="20" name="TextBox 1"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr/>{}</p:txBody></p:sp>"#,
        paragraphs(text)
    )
}

pub fn rectangle() -> String {
    r#"<p:sp><p:nvSpPr><p:cNvPr id="21" name="Rectangle 1"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:sp>"#
        .to_string()
}

pub fn picture(rel_id: &str) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="30" name="Picture 1" descr="logo"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:prstGeom prst="rect"/></p:spPr></p:pic>"#,
        rel_id
    )
}

pub fn picture_placeholder(idx: u32, rel_id: &str) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="31" name="Picture Placeholder 1"/><p:cNvPicPr><a:picLocks noGrp="1"/></p:cNvPicPr><p:nvPr><p:ph type="pic" idx="{}"/></p:nvPr></p:nvPicPr><p:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr/></p:pic>"#,
        idx, rel_id
    )
}

/// A movie whose poster frame is the image behind `poster_rel_id`.
pub fn video(poster_rel_id: &str) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="32" name="clip.mp4"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr><a:videoFile r:link="rId90"/></p:nvPr></p:nvPicPr><p:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:prstGeom prst="rect"/></p:spPr></p:pic>"#,
        poster_rel_id
    )
}

pub fn table() -> String {
    r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="40" name="Table 1"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><p:xfrm/><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl/></a:graphicData></a:graphic></p:graphicFrame>"#
        .to_string()
}

pub fn group() -> String {
    r#"<p:grpSp><p:nvGrpSpPr><p:cNvPr id="50" name="Group 1"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:grpSp>"#
        .to_string()
}

/// Rewrites the central directory of `archive` so that `entry` declares a ZIP64
/// uncompressed size of `size`. Entry data and local headers are untouched.
pub fn declare_entry_size(archive: &[u8], entry: &str, size: u64) -> Vec<u8> {
    let u16_at = |pos: usize| u16::from_le_bytes([archive[pos], archive[pos + 1]]) as usize;
    let u32_at = |pos: usize| {
        u32::from_le_bytes(archive[pos..pos + 4].try_into().expect("4 bytes")) as usize
    };

    let eocd = archive
        .windows(4)
        .rposition(|window| window == b"PK\x05\x06")
        .expect("end of central directory");
    let cd_offset = u32_at(eocd + 16);

    let mut out = archive[..cd_offset].to_vec();
    let mut pos = cd_offset;
    while archive[pos..].starts_with(b"PK\x01\x02") {
        let name_end = pos + 46 + u16_at(pos + 28);
        let extra_end = name_end + u16_at(pos + 30);
        let record_end = extra_end + u16_at(pos + 32);

        if &archive[pos + 46..name_end] == entry.as_bytes() {
            let mut header = archive[pos..pos + 46].to_vec();
            header[24..28].copy_from_slice(&u32::MAX.to_le_bytes());
            let extra_len = (extra_end - name_end + 12) as u16;
            header[30..32].copy_from_slice(&extra_len.to_le_bytes());
            out.extend_from_slice(&header);
            out.extend_from_slice(&archive[pos + 46..extra_end]);
            out.extend_from_slice(&[0x01, 0x00, 0x08, 0x00]);
            out.extend_from_slice(&size.to_le_bytes());
            out.extend_from_slice(&archive[extra_end..record_end]);
        } else {
            out.extend_from_slice(&archive[pos..record_end]);
        }
        pos = record_end;
    }

    let cd_size = (out.len() - cd_offset) as u32;
    let mut footer = archive[eocd..].to_vec();
    footer[12..16].copy_from_slice(&cd_size.to_le_bytes());
    out.extend_from_slice(&footer);
    out
}
