use dungeon_playback::{
    DrawColor, DrawInstruction, InMemorySink, PlaybackError, PlaybackSession,
    PlayerState, Rgba8, SENTINEL, ScriptGenerator, SessionOpts, StopReason,
};

fn px(frame: &dungeon_playback::FrameRGBA, x: u32, y: u32) -> Rgba8 {
    let i = ((y * frame.width + x) * 4) as usize;
    Rgba8::from([
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ])
}

#[test]
fn three_instruction_script_renders_two_frames_then_stops() {
    let script = vec![
        DrawInstruction::new(DrawColor::Off, 0, 0, 4, 4),
        DrawInstruction::new(DrawColor::On, 2, 2, 3, 3),
        DrawInstruction::new(DrawColor::On, 0, 0, 0, 0),
    ];
    let mut session = PlaybackSession::with_sink(
        ScriptGenerator::from(script),
        SessionOpts::default(),
        InMemorySink::new(),
    )
    .unwrap();

    let stats = session.run_unpaced().unwrap();
    assert_eq!(session.state(), PlayerState::Stopped);
    assert_eq!(stats.rendered, 2);
    assert_eq!(stats.stopped_by, Some(StopReason::Sentinel));

    let sink = session.into_sink();
    assert!(sink.ended());
    let frames = sink.frames();
    assert_eq!(frames.len(), 2);

    // Render 1: black 12x12 at the origin.
    let first = &frames[0].1;
    assert_eq!(px(first, 0, 0), Rgba8::BLACK);
    assert_eq!(px(first, 6, 6), Rgba8::BLACK);
    assert_eq!(px(first, 11, 11), Rgba8::BLACK);
    assert_eq!(px(first, 12, 12), Rgba8::TRANSPARENT);

    // Render 2: white 6x6 at (6, 6) with a black outline, over the black square.
    let second = &frames[1].1;
    assert_eq!(px(second, 6, 6), Rgba8::BLACK);
    assert_eq!(px(second, 11, 11), Rgba8::BLACK);
    assert_eq!(px(second, 7, 7), Rgba8::WHITE);
    assert_eq!(px(second, 10, 10), Rgba8::WHITE);
    assert_eq!(px(second, 5, 5), Rgba8::BLACK);
    assert_eq!(px(second, 12, 12), Rgba8::TRANSPARENT);
}

#[test]
fn rendered_count_matches_instructions_before_sentinel() {
    for n in 0..6u32 {
        let mut script: Vec<DrawInstruction> = (0..=n)
            .map(|i| DrawInstruction::new(DrawColor::On, i * 4, i, 3, 2))
            .collect();
        script.push(SENTINEL);
        let mut session =
            PlaybackSession::new(ScriptGenerator::from(script), SessionOpts::default()).unwrap();
        let stats = session.run_unpaced().unwrap();
        assert_eq!(stats.rendered, u64::from(n) + 1);
        assert_eq!(stats.ticks, u64::from(n));
    }
}

#[test]
fn off_instructions_fill_their_full_scaled_footprint() {
    let cases = [(0, 0, 1, 1), (3, 5, 2, 7), (10, 1, 9, 4), (100, 100, 28, 28)];
    for (x, y, w, h) in cases {
        let instr = DrawInstruction::new(DrawColor::Off, x, y, w, h);
        let mut session = PlaybackSession::new(
            ScriptGenerator::from(vec![instr, SENTINEL]),
            SessionOpts {
                clear: Rgba8::opaque(9, 9, 9),
                ..SessionOpts::default()
            },
        )
        .unwrap();
        session.run_unpaced().unwrap();
        let s = session.surface();
        let (x0, y0) = (x * 3, y * 3);
        let (x1, y1) = (x0 + w * 3, y0 + h * 3);
        assert_eq!(s.pixel(x0, y0), Some(Rgba8::BLACK));
        assert_eq!(s.pixel(x1 - 1, y1 - 1), Some(Rgba8::BLACK));
        assert_eq!(s.pixel(x1, y1), Some(Rgba8::opaque(9, 9, 9)));
        if x0 > 0 {
            assert_eq!(s.pixel(x0 - 1, y0), Some(Rgba8::opaque(9, 9, 9)));
        }
    }
}

#[test]
fn on_instructions_are_inset_by_one_cell() {
    let cases = [(2, 2, 3, 3), (10, 20, 9, 12), (40, 7, 31, 2)];
    for (x, y, w, h) in cases {
        let instr = DrawInstruction::new(DrawColor::On, x, y, w, h);
        let mut session =
            PlaybackSession::new(ScriptGenerator::from(vec![instr, SENTINEL]), SessionOpts::default())
                .unwrap();
        session.run_unpaced().unwrap();
        let s = session.surface();
        let (x0, y0) = (x * 3, y * 3);
        let (x1, y1) = (x0 + (w - 1) * 3, y0 + (h - 1) * 3);
        // Outline on the inner edge, white inside, nothing past (w - 1) cells.
        assert_eq!(s.pixel(x0, y0), Some(Rgba8::BLACK));
        assert_eq!(s.pixel(x1 - 1, y1 - 1), Some(Rgba8::BLACK));
        assert_eq!(s.pixel(x0 + 1, y0 + 1), Some(Rgba8::WHITE));
        assert_eq!(s.pixel(x1, y1), Some(Rgba8::TRANSPARENT));
    }
}

#[test]
fn script_without_sentinel_fails_the_session() {
    let mut session = PlaybackSession::with_sink(
        ScriptGenerator::from(vec![DrawInstruction::new(DrawColor::Off, 0, 0, 2, 2)]),
        SessionOpts::default(),
        InMemorySink::new(),
    )
    .unwrap();
    let err = session.run_unpaced().unwrap_err();
    assert!(matches!(err, PlaybackError::Generator(_)));
    assert_eq!(session.stats().stopped_by, Some(StopReason::Error));
    assert!(!session.sink().ended());
}

#[test]
fn inner_sentinel_ends_playback_early() {
    let script = vec![
        DrawInstruction::new(DrawColor::Off, 0, 0, 4, 4),
        SENTINEL,
        DrawInstruction::new(DrawColor::On, 1, 1, 3, 3),
        SENTINEL,
    ];
    let mut session =
        PlaybackSession::new(ScriptGenerator::from(script), SessionOpts::default()).unwrap();
    let stats = session.run_unpaced().unwrap();
    assert_eq!(stats.rendered, 1);
    assert_eq!(stats.stopped_by, Some(StopReason::Sentinel));
}

#[test]
fn sentinel_from_create_is_drawn_like_any_other_instruction() {
    let script = dungeon_playback::Script::new(vec![SENTINEL, SENTINEL]);
    assert!(script.check_unambiguous().is_ok());

    let mut session = PlaybackSession::with_sink(
        ScriptGenerator::from(vec![SENTINEL, SENTINEL]),
        SessionOpts::default(),
        InMemorySink::new(),
    )
    .unwrap();
    let stats = session.run_unpaced().unwrap();
    assert_eq!(stats.rendered, 1);
    assert_eq!(stats.ticks, 0);
    assert_eq!(stats.stopped_by, Some(StopReason::Sentinel));

    let sink = session.into_sink();
    let frames = sink.frames();
    assert_eq!(frames.len(), 1);
    assert!(frames[0].1.data.chunks(4).all(|p| p == [0, 0, 0, 0]));
}

#[test]
fn bsp_session_draws_background_and_rooms() {
    let params = dungeon_playback::BspParams {
        seed: Some(99),
        ..Default::default()
    };
    let mut session = PlaybackSession::new(
        dungeon_playback::BspGenerator::new(params).unwrap(),
        SessionOpts::default(),
    )
    .unwrap();
    let stats = session.run_unpaced().unwrap();
    assert_eq!(stats.rendered, 9);
    assert_eq!(stats.ticks, 8);
    let s = session.surface();
    // Background covers the whole 393x393 surface.
    assert_eq!(s.pixel(392, 392), Some(Rgba8::BLACK));
    let white = s
        .as_bytes()
        .chunks_exact(4)
        .filter(|p| *p == [255, 255, 255, 255])
        .count();
    assert!(white > 0);
}
