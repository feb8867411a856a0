use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use pdf_booklet::*;

fn create_test_pdf(num_pages: usize) -> Document {
    create_sized_pdf(num_pages, (420, 595), None)
}

/// Test document whose pages all share one MediaBox and optional `/Rotate`
fn create_sized_pdf(num_pages: usize, size: (i64, i64), rotate: Option<i64>) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    // Each page's content names the page so it can be traced through imposition
    let mut kids = Vec::new();
    for page_num in 0..num_pages {
        let content = format!("% page {}\n", page_num).into_bytes();
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

        let mut page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(size.0),
                    Object::Integer(size.1),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]);
        if let Some(degrees) = rotate {
            page.set("Rotate", Object::Integer(degrees));
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

fn parse_label(content: &[u8]) -> Option<usize> {
    let text = String::from_utf8_lossy(content);
    text.trim().strip_prefix("% page ")?.parse().ok()
}

/// Source page shown in each cell of an imposed sheet (None = no XObject)
fn cell_labels(doc: &Document, sheet_id: ObjectId, cells: usize) -> Vec<Option<usize>> {
    let page = doc.get_dictionary(sheet_id).unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();

    (0..cells)
        .map(|idx| {
            let name = format!("P{}", idx);
            let id = xobjects.get(name.as_bytes()).ok()?.as_reference().ok()?;
            let stream = doc.get_object(id).unwrap().as_stream().unwrap();
            parse_label(&stream.content)
        })
        .collect()
}

fn sheet_content(doc: &Document, sheet_id: ObjectId) -> String {
    String::from_utf8(doc.get_page_content(sheet_id).unwrap()).unwrap()
}

fn content_stream_id(doc: &Document, page_id: ObjectId) -> ObjectId {
    doc.get_dictionary(page_id)
        .unwrap()
        .get(b"Contents")
        .unwrap()
        .as_reference()
        .unwrap()
}

fn sheet_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

#[tokio::test]
async fn test_five_pages_make_one_sheet() {
    let output = make_booklet(create_test_pdf(5), &BookletConfig::default())
        .await
        .unwrap();

    let sheets = sheet_ids(&output);
    assert_eq!(sheets.len(), 1);

    // Reorder [1, 0, 2, 7, 3, 6, 4, 5]; pages 5, 6, 7 are blank
    assert_eq!(
        cell_labels(&output, sheets[0], 8),
        vec![Some(1), Some(0), Some(2), None, Some(3), None, Some(4), None]
    );

    let content = sheet_content(&output, sheets[0]);
    // Blank cells are still bordered
    assert_eq!(content.matches(" re S").count(), 8);
    assert!(content.contains("(1/1) Tj"));
}

#[tokio::test]
async fn test_nine_pages_make_two_sheets() {
    let output = make_booklet(create_test_pdf(9), &BookletConfig::default())
        .await
        .unwrap();

    let sheets = sheet_ids(&output);
    assert_eq!(sheets.len(), 2);

    assert_eq!(
        cell_labels(&output, sheets[0], 8),
        vec![
            Some(1),
            Some(0),
            Some(2),
            Some(7),
            Some(3),
            Some(6),
            Some(4),
            Some(5)
        ]
    );
    // Second signature: only page 8 is real, it lands in cell 1
    assert_eq!(
        cell_labels(&output, sheets[1], 8),
        vec![None, Some(8), None, None, None, None, None, None]
    );

    assert!(sheet_content(&output, sheets[0]).contains("(1/2) Tj"));
    assert!(sheet_content(&output, sheets[1]).contains("(2/2) Tj"));
}

#[tokio::test]
async fn test_sheet_media_box_is_a4() {
    let output = make_booklet(create_test_pdf(8), &BookletConfig::default())
        .await
        .unwrap();
    let sheet = output.get_dictionary(sheet_ids(&output)[0]).unwrap();
    let media_box = sheet.get(b"MediaBox").unwrap().as_array().unwrap();
    assert_eq!(media_box[2].as_float().unwrap(), 595.0);
    assert_eq!(media_box[3].as_float().unwrap(), 842.0);
}

#[tokio::test]
async fn test_decorations_can_be_disabled() {
    let config = BookletConfig {
        draw_borders: false,
        annotate_sheets: false,
        ..Default::default()
    };
    let output = make_booklet(create_test_pdf(8), &config).await.unwrap();
    let content = sheet_content(&output, sheet_ids(&output)[0]);
    assert!(!content.contains(" re S"));
    assert!(!content.contains("Tj"));
    assert_eq!(content.matches(" Do Q").count(), 8);
}

#[tokio::test]
async fn test_empty_document_makes_no_sheets() {
    let output = make_booklet(create_test_pdf(0), &BookletConfig::default())
        .await
        .unwrap();
    assert!(output.get_pages().is_empty());
}

#[tokio::test]
async fn test_make_booklet_rejects_invalid_config() {
    let config = BookletConfig {
        signature_size: 6,
        ..Default::default()
    };
    match make_booklet(create_test_pdf(4), &config).await {
        Err(BookletError::Config(_)) => {}
        other => panic!("Expected Config error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_pipeline_never_skips_cells() {
    // After padding every sheet is full, so the defensive skip never fires
    let config = BookletConfig::default();
    for count in 0..50 {
        let plan = plan_booklet(read_pages(&create_test_pdf(count)).unwrap(), &config).unwrap();
        assert_eq!(plan.pages.len() % config.signature_size, 0);
        for sheet in &plan.sheets {
            assert_eq!(sheet.cells.len(), config.cells_per_sheet());
        }
    }
}

#[test]
fn test_plan_matches_statistics() {
    let plan = plan_booklet(
        read_pages(&create_test_pdf(9)).unwrap(),
        &BookletConfig::default(),
    )
    .unwrap();
    assert_eq!(plan.statistics.output_sheets, plan.sheets.len());
    assert_eq!(plan.statistics.padded_pages, plan.pages.len());
    assert_eq!(plan.statistics.blank_pages_added, 7);
}

#[test]
fn test_impose_document_standalone_unpadded() {
    // Imposing an unpadded document directly rounds the sheet count up
    let output = impose_document(&create_test_pdf(10), &BookletConfig::default()).unwrap();
    let sheets = sheet_ids(&output);
    assert_eq!(sheets.len(), 2);
    assert_eq!(
        cell_labels(&output, sheets[1], 8),
        vec![Some(8), Some(9), None, None, None, None, None, None]
    );
    // Skipped cells get no border
    assert_eq!(sheet_content(&output, sheets[1]).matches(" re S").count(), 2);
    assert!(sheet_content(&output, sheets[1]).contains("(2/2) Tj"));
}

#[test]
fn test_rotated_pages_are_placed_as_displayed() {
    let config = BookletConfig::default();
    let landscape =
        plan_booklet(read_pages(&create_sized_pdf(8, (842, 595), None)).unwrap(), &config)
            .unwrap();
    let rotated =
        plan_booklet(read_pages(&create_sized_pdf(8, (595, 842), Some(90))).unwrap(), &config)
            .unwrap();

    for (plain, turned) in landscape.sheets[0].cells.iter().zip(&rotated.sheets[0].cells) {
        assert!((plain.content.width - turned.content.width).abs() < 1e-3);
        assert!((plain.content.height - turned.content.height).abs() < 1e-3);
    }
}

#[test]
fn test_rotated_page_matrix_undoes_column_turn() {
    // /Rotate 90 followed by the 270 turn of column 0 draws the page upright
    let output = impose_document(
        &create_sized_pdf(1, (595, 842), Some(90)),
        &BookletConfig::default(),
    )
    .unwrap();
    let content = sheet_content(&output, sheet_ids(&output)[0]);
    let placement = content.lines().find(|line| line.contains("/P0 Do")).unwrap();
    let operands: Vec<&str> = placement.split(" re W n ").nth(1).unwrap().split(' ').collect();
    assert_eq!(operands[1], "0");
    assert_eq!(operands[2], "0");
}

#[test]
fn test_undecodable_content_is_malformed() {
    let mut doc = create_test_pdf(1);
    let content_id = content_stream_id(&doc, sheet_ids(&doc)[0]);
    let stream = doc.get_object_mut(content_id).unwrap().as_stream_mut().unwrap();
    stream
        .dict
        .set("Filter", Object::Name(b"RunLengthDecode".to_vec()));

    match impose_document(&doc, &BookletConfig::default()) {
        Err(BookletError::MalformedDocument(_)) => {}
        other => panic!("Expected MalformedDocument, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_compressed_source_content_is_decoded() {
    let mut source = create_test_pdf(8);
    for page_id in sheet_ids(&source) {
        let content_id = content_stream_id(&source, page_id);
        let stream = source.get_object_mut(content_id).unwrap().as_stream_mut().unwrap();
        // Trailing whitespace makes the stream long enough to be worth compressing
        let mut content = stream.content.clone();
        content.extend(vec![b' '; 200]);
        stream.set_content(content);
        stream.compress().unwrap();
        assert!(stream.dict.has(b"Filter"));
    }

    let output = make_booklet(source, &BookletConfig::default())
        .await
        .unwrap();
    assert_eq!(
        cell_labels(&output, sheet_ids(&output)[0], 8),
        vec![
            Some(1),
            Some(0),
            Some(2),
            Some(7),
            Some(3),
            Some(6),
            Some(4),
            Some(5)
        ]
    );
}
