//! End-to-end packaging tests.
//!
//! Each test builds a book in memory, opens the result with `zip`, and checks
//! the archive layout and the XML documents inside it.

use std::io::{Cursor, Read};
use std::thread;
use std::time::Duration;

use folio::{BoxError, BuildRequest, Chapter, Error, PackageBuffer, Packager, PackagerConfig};
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use zip::{CompressionMethod, ZipArchive};

fn open(book: &PackageBuffer) -> ZipArchive<Cursor<Vec<u8>>> {
    ZipArchive::new(Cursor::new(book.as_bytes().to_vec())).expect("valid zip")
}

fn member_names(book: &PackageBuffer) -> Vec<String> {
    let mut archive = open(book);
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

fn read_member(book: &PackageBuffer, name: &str) -> String {
    let mut archive = open(book);
    let mut file = archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("missing {name}"));
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    out
}

/// Fail on any element or attribute prefix with no namespace in scope.
fn assert_bound(reader: &NsReader<&[u8]>, e: &BytesStart<'_>, xml: &str) {
    if let (ResolveResult::Unknown(prefix), _) = reader.resolve_element(e.name()) {
        panic!("unbound prefix {:?}\n{xml}", String::from_utf8_lossy(&prefix));
    }
    for attr in e.attributes() {
        let key = attr.expect("valid attribute").key;
        if let (ResolveResult::Unknown(prefix), _) = reader.resolve_attribute(key) {
            panic!("unbound prefix {:?}\n{xml}", String::from_utf8_lossy(&prefix));
        }
    }
}

/// Parse `xml` strictly, namespaces included, and return the local names of
/// all start/empty tags.
fn element_names(xml: &str) -> Vec<String> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().check_end_names = true;
    let mut names = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                assert_bound(&reader, &e, xml);
                names.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("malformed XML: {e}\n{xml}"),
        }
    }
    names
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

fn scenario_a() -> BuildRequest {
    BuildRequest::new("Scenario A").with_chapter(
        Chapter::new("intro", 1, "Intro").with_body("# Hi\n\nHello<br>World"),
    )
}

fn fixed(identifier: &str) -> Packager {
    Packager::new().with_config(PackagerConfig::default().with_identifier(identifier))
}

#[test]
fn test_scenario_a_single_chapter() {
    let book = Packager::new().package(&scenario_a()).unwrap();

    let chapter = read_member(&book, "ch_0.xhtml");
    assert!(chapter.contains("Hello<br />World"), "{chapter}");
    assert!(!chapter.contains("<br>"));

    let opf = read_member(&book, "content.opf");
    assert!(opf.contains(
        r#"<item id="ch_0" href="ch_0.xhtml" media-type="application/xhtml+xml"/>"#
    ));
    assert_eq!(count(&opf, "application/xhtml+xml"), 1);
    assert_eq!(count(&opf, "<itemref "), 1);
    assert!(opf.contains(r#"<itemref idref="ch_0"/>"#));

    let ncx = read_member(&book, "toc.ncx");
    assert_eq!(count(&ncx, "<navPoint "), 1);
    assert!(ncx.contains(r#"playOrder="0""#));
    assert!(ncx.contains("<text>Intro</text>"));
    assert!(ncx.contains(r#"<content src="ch_0.xhtml"/>"#));
}

#[test]
fn test_archive_layout() {
    let request = BuildRequest::new("Layout")
        .with_chapter(Chapter::new("a", 1, "A").with_body("a"))
        .with_chapter(Chapter::new("b", 2, "B").with_body("b"))
        .with_chapter(Chapter::new("c", 3, "C").with_body("c"));
    let book = Packager::new().package(&request).unwrap();

    assert_eq!(
        member_names(&book),
        [
            "mimetype",
            "META-INF/container.xml",
            "styles.css",
            "ch_0.xhtml",
            "ch_1.xhtml",
            "ch_2.xhtml",
            "content.opf",
            "toc.ncx",
        ]
    );
}

#[test]
fn test_mimetype_is_first_and_stored() {
    let book = Packager::new().package(&scenario_a()).unwrap();
    let bytes = book.as_bytes();

    assert_eq!(&bytes[0..4], b"PK\x03\x04");
    assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), 0);
    assert_eq!(&bytes[30..38], b"mimetype");

    let mut archive = open(&book);
    let first = archive.by_index(0).unwrap();
    assert_eq!(first.name(), "mimetype");
    assert_eq!(first.compression(), CompressionMethod::Stored);
    drop(first);
    assert_eq!(read_member(&book, "mimetype"), "application/epub+zip");
}

#[test]
fn test_scenario_b_out_of_order_completion() {
    // The first chapter finishes rendering last.
    let renderer = |c: &Chapter| -> Result<String, BoxError> {
        if c.sequence == 1 {
            thread::sleep(Duration::from_millis(150));
        }
        Ok(format!("<p>{}</p>", c.body))
    };
    let request = BuildRequest::new("Race")
        .with_chapter(Chapter::new("first", 1, "First").with_body("one"))
        .with_chapter(Chapter::new("second", 2, "Second").with_body("two"));
    let book = Packager::new()
        .with_renderer(renderer)
        .package(&request)
        .unwrap();

    assert!(read_member(&book, "ch_0.xhtml").contains("<p>one</p>"));
    assert!(read_member(&book, "ch_1.xhtml").contains("<p>two</p>"));

    let ncx = read_member(&book, "toc.ncx");
    assert!(ncx.find("First").unwrap() < ncx.find("Second").unwrap());
    let opf = read_member(&book, "content.opf");
    assert!(opf.find(r#"idref="ch_0""#).unwrap() < opf.find(r#"idref="ch_1""#).unwrap());
    assert_eq!(book.chapters()[0].id, "first");
}

#[test]
fn test_scenario_c_empty_chapter_placeholder() {
    let request = BuildRequest::new("Sparse")
        .with_chapter(Chapter::new("a", 1, "Has text").with_body("words"))
        .with_chapter(Chapter::new("b", 2, "Blank"));
    let book = Packager::new().package(&request).unwrap();

    let chapter = read_member(&book, "ch_1.xhtml");
    assert!(chapter.contains(r#"<h2 class="placeholder">No content</h2>"#));
    assert_eq!(count(&read_member(&book, "toc.ncx"), "<navPoint "), 2);
}

#[test]
fn test_scenario_d_title_is_escaped() {
    let request = BuildRequest::new("Tom & Jerry")
        .with_chapter(Chapter::new("qa", 1, "Q&A <live>").with_body("text"));
    let book = Packager::new().package(&request).unwrap();

    let chapter = read_member(&book, "ch_0.xhtml");
    assert!(chapter.contains("<title>Q&amp;A &lt;live&gt;</title>"));
    let ncx = read_member(&book, "toc.ncx");
    assert!(ncx.contains("<text>Q&amp;A &lt;live&gt;</text>"));
    assert!(ncx.contains("<text>Tom &amp; Jerry</text>"));
    assert!(read_member(&book, "content.opf").contains("<dc:title>Tom &amp; Jerry</dc:title>"));

    element_names(&chapter);
    element_names(&ncx);
}

#[test]
fn test_order_follows_list_not_sequence() {
    let request = BuildRequest::new("Gaps")
        .with_chapter(Chapter::new("z", 40, "Forty").with_body("40"))
        .with_chapter(Chapter::new("y", 3, "Three").with_body("3"))
        .with_chapter(Chapter::new("x", 17, "Seventeen").with_body("17"));
    let book = Packager::new().package(&request).unwrap();

    let ncx = read_member(&book, "toc.ncx");
    let forty = ncx.find("Forty").unwrap();
    let three = ncx.find("Three").unwrap();
    let seventeen = ncx.find("Seventeen").unwrap();
    assert!(forty < three && three < seventeen);

    let pos = book.position_for("ch_2.xhtml").unwrap();
    assert_eq!((pos.index, pos.sequence, pos.chapter_id), (2, 17, "x"));
}

#[test]
fn test_all_documents_are_well_formed() {
    let request = BuildRequest::new("Markup")
        .with_author("A & B")
        .with_chapter(Chapter::new("a", 1, "Images").with_body(
            "Before<hr>after ![alt](pic.png) and <img src=\"x\"> &nbsp; done",
        ))
        .with_chapter(Chapter::new("b", 2, "Tables").with_body(
            "| a | b |\n|---|---|\n| 1 | 2 |\n\n<div><p>unclosed<br></div>",
        ));
    let book = Packager::new().package(&request).unwrap();

    for name in member_names(&book) {
        if name.ends_with(".xhtml") || name.ends_with(".opf") || name.ends_with(".ncx") {
            element_names(&read_member(&book, &name));
        }
    }

    let chapter = read_member(&book, "ch_0.xhtml");
    assert!(chapter.contains("<hr />"));
    assert!(chapter.contains(r#"<img src="x" />"#));
    assert!(chapter.contains(r#"<img src="pic.png" alt="alt" />"#));
    assert!(chapter.contains("&#160;"));
    assert!(!chapter.contains("&nbsp;"));
}

#[test]
fn test_pasted_office_markup_is_namespace_clean() {
    let request = BuildRequest::new("Pasted").with_chapter(
        Chapter::new("w", 1, "Word").with_body(
            "<p class=\"MsoNormal\">Pasted<o:p></o:p></p>\n\n<p v:shape=\"x\">s</p>",
        ),
    );
    let book = Packager::new().package(&request).unwrap();

    let chapter = read_member(&book, "ch_0.xhtml");
    assert!(!chapter.contains("o:p"), "{chapter}");
    assert!(!chapter.contains("v:shape"), "{chapter}");
    assert!(chapter.contains("Pasted"));
    element_names(&chapter);
}

#[test]
fn test_inline_svg_with_html_island() {
    let request = BuildRequest::new("Figures").with_chapter(
        Chapter::new("f", 1, "Figure").with_body(
            "<svg><foreignObject><p>caption</p></foreignObject></svg>",
        ),
    );
    let book = Packager::new().package(&request).unwrap();

    let chapter = read_member(&book, "ch_0.xhtml");
    assert!(chapter.contains(r#"<svg xmlns="http://www.w3.org/2000/svg">"#));
    assert!(chapter.contains(r#"<p xmlns="http://www.w3.org/1999/xhtml">caption</p>"#));
    element_names(&chapter);
}

#[test]
fn test_control_characters_removed_from_titles() {
    let request = BuildRequest::new("Bell\u{7}Book")
        .with_chapter(Chapter::new("c", 1, "Q&A\u{1}").with_body("text"));
    let book = Packager::new().package(&request).unwrap();

    let ncx = read_member(&book, "toc.ncx");
    assert!(ncx.contains("<text>BellBook</text>"));
    assert!(ncx.contains("<text>Q&amp;A</text>"));
    assert!(read_member(&book, "content.opf").contains("<dc:title>BellBook</dc:title>"));
    assert!(read_member(&book, "ch_0.xhtml").contains("<title>Q&amp;A</title>"));
    element_names(&ncx);
}

#[test]
fn test_opf_structure() {
    let book = fixed("urn:uuid:structure").package(&scenario_a()).unwrap();
    let opf = read_member(&book, "content.opf");
    let names = element_names(&opf);

    assert_eq!(names[0], "package");
    for expected in ["metadata", "title", "language", "identifier", "manifest", "spine"] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }
    assert_eq!(names.iter().filter(|n| *n == "item").count(), 3);
    assert!(opf.contains(r#"<spine toc="ncx">"#));
    assert!(opf.contains("urn:uuid:structure"));
    assert!(read_member(&book, "toc.ncx").contains(r#"content="urn:uuid:structure""#));
}

#[test]
fn test_idempotent_modulo_identifier() {
    let request = scenario_a();

    let a = fixed("urn:uuid:same").package(&request).unwrap();
    let b = fixed("urn:uuid:same").package(&request).unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());

    let c = Packager::new().package(&request).unwrap();
    let d = Packager::new().package(&request).unwrap();
    assert_ne!(c.identifier(), d.identifier());
    let strip = |book: &PackageBuffer| read_member(book, "content.opf").replace(book.identifier(), "");
    assert_eq!(strip(&c), strip(&d));
}

#[test]
fn test_custom_stylesheet_and_language() {
    let config = PackagerConfig::default()
        .with_language("de")
        .with_stylesheet("body { color: red; }");
    let book = Packager::new().with_config(config).package(&scenario_a()).unwrap();

    assert_eq!(read_member(&book, "styles.css"), "body { color: red; }");
    assert!(read_member(&book, "content.opf").contains("<dc:language>de</dc:language>"));
    assert!(read_member(&book, "ch_0.xhtml").contains(r#"xml:lang="de""#));
}

#[test]
fn test_render_failure_names_chapter() {
    let renderer = |c: &Chapter| -> Result<String, BoxError> {
        if c.id == "broken" {
            Err("unterminated block".into())
        } else {
            Ok(c.body.clone())
        }
    };
    let request = BuildRequest::new("Broken")
        .with_chapter(Chapter::new("ok", 1, "Fine").with_body("fine"))
        .with_chapter(Chapter::new("broken", 2, "Bad").with_body("bad"));

    let err = Packager::new()
        .with_renderer(renderer)
        .package(&request)
        .unwrap_err();
    assert!(matches!(err, Error::ChapterRenderFailed { ref id, sequence: 2, .. } if id == "broken"));
    assert!(err.to_string().contains("broken"));
}

#[test]
fn test_write_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.epub");

    let book = Packager::new().package(&scenario_a()).unwrap();
    book.write_to(&path).unwrap();

    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, book.as_bytes());
}

#[test]
fn test_concurrent_builds_are_independent() {
    let packager = Packager::new();
    let books: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let packager = &packager;
                s.spawn(move || {
                    let request = BuildRequest::new(format!("Book {i}"))
                        .with_chapter(Chapter::new("c", 1, format!("Only {i}")).with_body("x"));
                    packager.package(&request).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, book) in books.iter().enumerate() {
        assert!(read_member(book, "toc.ncx").contains(&format!("Only {i}")));
    }
}
