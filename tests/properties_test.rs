//! Property tests over arbitrary chapter lists.

use std::io::{Cursor, Read};

use folio::{BuildRequest, Chapter, Packager, PackagerConfig};
use proptest::prelude::*;
use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use zip::ZipArchive;

fn read_member(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut out = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut out)
        .unwrap();
    out
}

fn assert_well_formed(xml: &str) {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().check_end_names = true;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if let (ResolveResult::Unknown(prefix), _) = reader.resolve_element(e.name()) {
                    panic!("unbound prefix {:?}\n{xml}", String::from_utf8_lossy(&prefix));
                }
                for attr in e.attributes() {
                    let key = attr.unwrap().key;
                    if let (ResolveResult::Unknown(prefix), _) = reader.resolve_attribute(key) {
                        panic!("unbound prefix {:?}\n{xml}", String::from_utf8_lossy(&prefix));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("malformed XML: {e}\n{xml}"),
        }
    }
}

fn chapter_strategy() -> impl Strategy<Value = (u32, String, String)> {
    (
        1u32..10_000,
        "[A-Za-z&<>\" ]{0,20}",
        prop_oneof![
            Just(String::new()),
            "[a-z ]{1,40}",
            "[a-z<>/&#;*_ ]{1,60}",
        ],
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn counts_and_order_match_input(chapters in prop::collection::vec(chapter_strategy(), 1..12)) {
        let request = chapters.iter().enumerate().fold(
            BuildRequest::new("Generated"),
            |req, (i, (sequence, title, body))| {
                req.with_chapter(Chapter::new(format!("id{i}"), *sequence, title.clone()).with_body(body.clone()))
            },
        );
        let packager = Packager::new()
            .with_config(PackagerConfig::default().with_identifier("urn:uuid:prop"));
        let book = packager.package(&request).unwrap();
        let bytes = book.as_bytes();
        let n = chapters.len();

        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        prop_assert_eq!(archive.len(), n + 5);

        let opf = read_member(bytes, "content.opf");
        let ncx = read_member(bytes, "toc.ncx");
        prop_assert_eq!(opf.matches("application/xhtml+xml").count(), n);
        prop_assert_eq!(opf.matches("<itemref ").count(), n);
        prop_assert_eq!(ncx.matches("<navPoint ").count(), n);

        let mut last = 0;
        for i in 0..n {
            let spine_at = opf.find(&format!("<itemref idref=\"ch_{i}\"/>")).unwrap();
            prop_assert!(spine_at >= last);
            last = spine_at;
            let play_order = format!("playOrder=\"{i}\"");
            prop_assert!(ncx.contains(&play_order));

            let doc = read_member(bytes, &format!("ch_{i}.xhtml"));
            assert_well_formed(&doc);

            let position = book.position_for(&format!("ch_{i}.xhtml")).unwrap();
            prop_assert_eq!(position.sequence, chapters[i].0);
        }
        assert_well_formed(&opf);
        assert_well_formed(&ncx);
    }
}

fn void_tag() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("<br>"), Just("<hr>"), Just("<img src=\"x\">")]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn void_tags_are_always_self_closed(
        parts in prop::collection::vec(("[a-z ]{1,12}", void_tag()), 1..8)
    ) {
        let body: String = parts.iter().map(|(text, tag)| format!("{text}{tag}")).collect();
        let renderer = |c: &Chapter| -> Result<String, folio::BoxError> { Ok(c.body.clone()) };
        let request = BuildRequest::new("Voids")
            .with_chapter(Chapter::new("v", 1, "Voids").with_body(body));
        let book = Packager::new().with_renderer(renderer).package(&request).unwrap();
        let doc = read_member(book.as_bytes(), "ch_0.xhtml");

        for (_, tag) in &parts {
            let closed = format!("{} />", &tag[..tag.len() - 1]);
            prop_assert!(doc.contains(&closed), "missing {} in {}", closed, doc);
        }
        prop_assert!(!doc.contains("<br>"));
        prop_assert!(!doc.contains("<hr>"));
        prop_assert!(!doc.contains("<img src=\"x\">"));
        assert_well_formed(&doc);
    }
}
