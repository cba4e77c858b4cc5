use sfen_view_core::{
    DrawingInstruction, LayoutOptions, LocateError, PieceKind, SFEN_HIRATE, SfenError, Side,
    decode, layout, locate, sfen_run_at,
};

#[test]
fn text_to_diagram_for_hirate() {
    let text = format!("foo {SFEN_HIRATE} bar");
    let sfen = locate(&text).expect("SFEN located");
    assert!(sfen.starts_with(SFEN_HIRATE));

    let pos = decode(&sfen).expect("decodes despite trailing token");
    assert_eq!(pos.occupied_count(), 40);
    assert_eq!(pos.turn(), Side::Sente);

    let diagram = layout(&pos, &LayoutOptions::default());
    let lines = diagram
        .instructions
        .iter()
        .filter(|i| matches!(i, DrawingInstruction::Line { .. }))
        .count();
    let rects = diagram
        .instructions
        .iter()
        .filter(|i| matches!(i, DrawingInstruction::FilledRect { .. }))
        .count();
    assert_eq!(lines, 20);
    assert_eq!(rects, 1);
}

#[test]
fn hover_run_then_locate() {
    let line = "    // tsume: 7k1/9/7P1/9/9/9/9/9/9 b G2r 1, solve it";
    let offset = line.find("7P1").unwrap();
    let run = sfen_run_at(line, offset).expect("run under cursor");
    let sfen = locate(run).expect("located");
    let pos = decode(&sfen).expect("decodes");

    assert_eq!(pos.piece_at(2, 1).map(|p| p.kind), Some(PieceKind::King));
    assert_eq!(pos.hand(Side::Sente).count(PieceKind::Gold), 1);
    assert_eq!(pos.hand(Side::Gote).count(PieceKind::Rook), 2);
}

#[test]
fn plain_prose_is_not_found() {
    assert_eq!(locate("no position here, just a/b path"), Err(LocateError::NotFound));
}

#[test]
fn board_shaped_garbage_is_located_but_rejected() {
    let sfen = locate("a/b/c/d/e/f/g/h/i b -").unwrap();
    assert!(matches!(decode(&sfen), Err(SfenError::Board(_))));
}

#[test]
fn decode_encode_roundtrip_is_stable() {
    for sfen in [
        SFEN_HIRATE,
        "ln1g3nl/1r1s1kg2/p1ppppsp1/1p4p1p/9/2P1P4/PPBP1PPPP/2S2S1R1/LN1GKG1NL w Bp 20",
        "9/9/9/9/9/9/9/9/9 w 3K2k 1",
    ] {
        let pos = decode(sfen).unwrap();
        let again = decode(&pos.to_sfen()).unwrap();
        assert_eq!(pos, again, "{sfen}");
    }
}
