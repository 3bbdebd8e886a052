//! In-memory `.pptx` packages for tests.
//!
//! Every package has one master (title and body placeholders, text styles and
//! a theme), one layout (title, body `idx=1` and subtitle `idx=2`), a PNG at
//! `/ppt/media/image1.png` and a chart part. Each slide relates the image as
//! `rId2` and the chart as `rId3`.

use crate::ooxml::opc::constants::{content_type as CT, relationship_type as RT};
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// 1x1 PNG.
pub(crate) const PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// One slide of a fixture package.
#[derive(Debug, Clone, Default)]
pub(crate) struct SlideFixture {
    /// Shape elements placed in `p:spTree`
    pub shapes: String,
    pub hidden: bool,
    /// Use the package image as the background picture
    pub image_background: bool,
}

impl SlideFixture {
    pub fn new(shapes: impl Into<String>) -> Self {
        Self {
            shapes: shapes.into(),
            ..Self::default()
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_image_background(mut self) -> Self {
        self.image_background = true;
        self
    }

    fn to_xml(&self) -> String {
        let show = if self.hidden { r#" show="0""# } else { "" };
        let background = if self.image_background {
            r#"<p:bg><p:bgPr><a:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></a:blipFill><a:effectLst/></p:bgPr></p:bg>"#
        } else {
            ""
        };
        format!(
            r#"{DECL}<p:sld {NS}{show}><p:cSld>{background}<p:spTree>{}{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
            GROUP_PROPS, self.shapes
        )
    }
}

const GROUP_PROPS: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

fn xfrm(x: i64, y: i64, cx: i64, cy: i64) -> String {
    format!(r#"<a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#)
}

fn run(text: &str) -> String {
    format!(r#"<a:r><a:rPr lang="en-US" dirty="0"/><a:t>{text}</a:t></a:r>"#)
}

/// Slide title placeholder without geometry.
pub(crate) fn title(id: u32, text: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Title {}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p>{}</a:p></p:txBody></p:sp>"#,
        id - 1,
        run(text)
    )
}

/// Slide body placeholder (`idx=1`), one paragraph per entry.
pub(crate) fn body(id: u32, paragraphs: &[&str]) -> String {
    let paragraphs: String = paragraphs
        .iter()
        .map(|text| format!("<a:p>{}</a:p>", run(text)))
        .collect();
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Content Placeholder {}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#,
        id - 1
    )
}

/// Text box of `cx` x `cy` EMU with shrink autofit and one run per size.
pub(crate) fn textbox(id: u32, cx: i64, cy: i64, runs: &[(&str, i32)]) -> String {
    let runs: String = runs
        .iter()
        .map(|(text, size)| format!(r#"<a:r><a:rPr lang="en-US" sz="{}"/><a:t>{text}</a:t></a:r>"#, size * 100))
        .collect();
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="TextBox {}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square"><a:normAutofit/></a:bodyPr><a:lstStyle/><a:p>{runs}</a:p></p:txBody></p:sp>"#,
        id - 1,
        xfrm(914_400, 914_400, cx, cy)
    )
}

/// Rectangle without text.
pub(crate) fn rectangle(id: u32) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Rectangle {}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="4472C4"/></a:solidFill></p:spPr></p:sp>"#,
        id - 1,
        xfrm(0, 0, 914_400, 914_400)
    )
}

/// Picture of the package image (`rId2`).
pub(crate) fn picture(id: u32) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {}" descr="logo"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
        id - 1,
        xfrm(0, 0, 914_400, 914_400)
    )
}

/// 2x2 table.
pub(crate) fn table(id: u32) -> String {
    let cell = |text: &str| format!("<a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p>{}</a:p></a:txBody><a:tcPr/></a:tc>", run(text));
    format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{id}" name="Table {}"/><p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr><p:nvPr/></p:nvGraphicFramePr><p:xfrm><a:off x="0" y="0"/><a:ext cx="1828800" cy="740664"/></p:xfrm><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblPr firstRow="1" bandRow="1"/><a:tblGrid><a:gridCol w="914400"/><a:gridCol w="914400"/></a:tblGrid><a:tr h="370332">{}{}</a:tr><a:tr h="370332">{}{}</a:tr></a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#,
        id - 1,
        cell("a1"),
        cell("b1"),
        cell("a2"),
        cell("b2")
    )
}

/// Chart frame pointing at the package chart (`rId3`).
pub(crate) fn chart(id: u32) -> String {
    format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{id}" name="Chart {}"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><p:xfrm><a:off x="0" y="0"/><a:ext cx="1828800" cy="1828800"/></p:xfrm><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="rId3"/></a:graphicData></a:graphic></p:graphicFrame>"#,
        id - 1
    )
}

/// Group of `children`.
pub(crate) fn group(id: u32, children: &str) -> String {
    format!(
        r#"<p:grpSp><p:nvGrpSpPr><p:cNvPr id="{id}" name="Group {}"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr>{}</p:grpSpPr>{children}</p:grpSp>"#,
        id - 1,
        xfrm(0, 0, 1_828_800, 914_400)
    )
}

pub(crate) fn connector(id: u32) -> String {
    format!(
        r#"<p:cxnSp><p:nvCxnSpPr><p:cNvPr id="{id}" name="Straight Connector {}"/><p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr><p:spPr>{}<a:prstGeom prst="line"><a:avLst/></a:prstGeom></p:spPr></p:cxnSp>"#,
        id - 1,
        xfrm(0, 0, 914_400, 0)
    )
}

fn layout_placeholder(id: u32, name: &str, ph: &str, geometry: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{ph}</p:nvPr></p:nvSpPr><p:spPr>{geometry}</p:spPr><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#
    )
}

fn master_xml() -> String {
    let shapes = layout_placeholder(
        2,
        "Title Placeholder 1",
        r#"<p:ph type="title"/>"#,
        &xfrm(838_200, 365_125, 10_515_600, 1_325_563),
    ) + &layout_placeholder(
        3,
        "Text Placeholder 2",
        r#"<p:ph type="body" idx="1"/>"#,
        &xfrm(838_200, 1_825_625, 10_515_600, 4_351_338),
    );
    let styles = r#"<p:txStyles><p:titleStyle><a:lvl1pPr algn="l"><a:defRPr sz="4400" kern="1200"><a:latin typeface="+mj-lt"/></a:defRPr></a:lvl1pPr></p:titleStyle><p:bodyStyle><a:lvl1pPr marL="228600"><a:defRPr sz="2800"><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr><a:lvl2pPr marL="685800"><a:defRPr sz="2400"><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl2pPr></p:bodyStyle><p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:otherStyle></p:txStyles>"#;
    format!(
        r#"{DECL}<p:sldMaster {NS}><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{GROUP_PROPS}{shapes}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>{styles}</p:sldMaster>"#
    )
}

fn layout_xml() -> String {
    let shapes = layout_placeholder(2, "Title 1", r#"<p:ph type="title"/>"#, "")
        + &layout_placeholder(3, "Content Placeholder 2", r#"<p:ph idx="1"/>"#, "")
        + &layout_placeholder(
            4,
            "Subtitle 3",
            r#"<p:ph type="subTitle" idx="2"/>"#,
            &xfrm(1_524_000, 3_602_038, 9_144_000, 1_655_762),
        );
    format!(
        r#"{DECL}<p:sldLayout {NS} type="obj" preserve="1"><p:cSld name="Title and Content"><p:spTree>{GROUP_PROPS}{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme></a:themeElements></a:theme>"#;

const CHART: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart><c:plotArea/></c:chart></c:chartSpace>"#;

fn rels(entries: &[(&str, &str, &str)]) -> String {
    let body: String = entries
        .iter()
        .map(|(id, reltype, target)| format!(r#"<Relationship Id="{id}" Type="{reltype}" Target="{target}"/>"#))
        .collect();
    format!(
        r#"{DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{body}</Relationships>"#
    )
}

/// A complete package with `slides` in order.
pub(crate) fn pptx(slides: &[SlideFixture]) -> Vec<u8> {
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();
    let mut put = |name: &str, data: Vec<u8>| files.push((name.to_string(), data));

    let slide_overrides: String = (1..=slides.len())
        .map(|n| format!(r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="{}"/>"#, CT::PML_SLIDE))
        .collect();
    put(
        "[Content_Types].xml",
        format!(
            r#"{DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="{}"/><Default Extension="xml" ContentType="{}"/><Default Extension="png" ContentType="{}"/><Override PartName="/ppt/presentation.xml" ContentType="{}"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="{}"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="{}"/><Override PartName="/ppt/theme/theme1.xml" ContentType="{}"/><Override PartName="/ppt/charts/chart1.xml" ContentType="{}"/>{slide_overrides}</Types>"#,
            CT::OPC_RELATIONSHIPS,
            CT::XML,
            CT::PNG,
            CT::PML_PRESENTATION_MAIN,
            CT::PML_SLIDE_MASTER,
            CT::PML_SLIDE_LAYOUT,
            CT::OFC_THEME,
            CT::DML_CHART
        )
        .into_bytes(),
    );
    put(
        "_rels/.rels",
        rels(&[("rId1", RT::OFFICE_DOCUMENT, "ppt/presentation.xml")]).into_bytes(),
    );

    let slide_ids: String = (1..=slides.len())
        .map(|n| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + n, n + 2))
        .collect();
    put(
        "ppt/presentation.xml",
        format!(
            r#"{DECL}<p:presentation {NS} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{slide_ids}</p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
        )
        .into_bytes(),
    );
    let slide_targets: Vec<(String, String)> = (1..=slides.len())
        .map(|n| (format!("rId{}", n + 2), format!("slides/slide{n}.xml")))
        .collect();
    let mut pres_rels = vec![
        ("rId1", RT::SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
        ("rId2", RT::THEME, "theme/theme1.xml"),
    ];
    pres_rels.extend(
        slide_targets
            .iter()
            .map(|(id, target)| (id.as_str(), RT::SLIDE, target.as_str())),
    );
    put("ppt/_rels/presentation.xml.rels", rels(&pres_rels).into_bytes());

    put("ppt/slideMasters/slideMaster1.xml", master_xml().into_bytes());
    put(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        rels(&[
            ("rId1", RT::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
            ("rId2", RT::THEME, "../theme/theme1.xml"),
        ])
        .into_bytes(),
    );
    put("ppt/slideLayouts/slideLayout1.xml", layout_xml().into_bytes());
    put(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        rels(&[("rId1", RT::SLIDE_MASTER, "../slideMasters/slideMaster1.xml")]).into_bytes(),
    );
    put("ppt/theme/theme1.xml", THEME.as_bytes().to_vec());
    put("ppt/media/image1.png", PNG.to_vec());
    put("ppt/charts/chart1.xml", CHART.as_bytes().to_vec());

    for (n, slide) in slides.iter().enumerate() {
        put(&format!("ppt/slides/slide{}.xml", n + 1), slide.to_xml().into_bytes());
        put(
            &format!("ppt/slides/_rels/slide{}.xml.rels", n + 1),
            rels(&[
                ("rId1", RT::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
                ("rId2", RT::IMAGE, "../media/image1.png"),
                ("rId3", RT::CHART, "../charts/chart1.xml"),
            ])
            .into_bytes(),
        );
    }

    let mut data = Vec::new();
    {
        let mut writer = ZipWriter::new(Cursor::new(&mut data));
        let options = SimpleFileOptions::default();
        for (name, bytes) in files {
            writer.start_file(name, options).unwrap();
            writer.write_all(&bytes).unwrap();
        }
        writer.finish().unwrap();
    }
    data
}
