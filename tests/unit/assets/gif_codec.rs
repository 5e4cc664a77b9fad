use super::*;

fn palette() -> Arc<Palette> {
    Arc::new(Palette::new(vec![[255, 0, 0], [0, 255, 0], [0, 0, 255]], Some(2)).unwrap())
}

fn two_frame_partial() -> Animation {
    let full = Frame::new(Bounds::new(0, 0, 4, 4).unwrap(), palette(), vec![0; 16])
        .unwrap()
        .with_delay(7);
    let partial = Frame::new(Bounds::new(1, 2, 2, 1).unwrap(), palette(), vec![1, 2])
        .unwrap()
        .with_delay(9)
        .with_disposal(Disposal::Background);
    Animation::new(4, 4, vec![full, partial]).unwrap()
}

#[test]
fn partial_frames_survive_encoding() {
    let bytes = encode_to_vec(&two_frame_partial()).unwrap();
    let decoded = decode(bytes.as_slice()).unwrap();

    assert_eq!(decoded.len(), 2);
    assert_eq!((decoded.screen_width, decoded.screen_height), (4, 4));
    assert_eq!(decoded.frames[1].bounds, Bounds::new(1, 2, 2, 1).unwrap());
    assert_eq!(decoded.frames[1].indices, vec![1, 2]);
    assert_eq!(decoded.frames[1].palette.transparent(), Some(2));
    assert_eq!(decoded.frames[1].disposal, Disposal::Background);
    assert_eq!(decoded.frames[0].delay, 7);
    assert!(!decoded.is_normalized());
}

#[test]
fn garbage_is_corrupt_data() {
    let err = decode(&b"definitely not a gif"[..]).unwrap_err();
    assert!(matches!(err, MemeError::CorruptData(_)));
}

#[test]
fn missing_file_is_io_not_found() {
    let err = decode_file("/no/such/file.gif").unwrap_err();
    assert_eq!(err.class(), crate::foundation::error::ErrorClass::NotFound);
}

#[test]
fn screen_grows_to_cover_frames() {
    let mut anim = two_frame_partial();
    anim.screen_width = 1;
    anim.screen_height = 1;
    assert_eq!(screen_size(&anim), (4, 4));
}
