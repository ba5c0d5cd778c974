use base64::{Engine as _, engine::general_purpose::STANDARD};
use foodgram_api::{
    error::AppError,
    media::{decode_image, remove_image, save_image},
};

const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[test]
fn data_uri_uses_declared_type() {
    let encoded = format!("data:image/jpeg;base64,{}", STANDARD.encode(b"not really a jpeg"));
    let image = decode_image(&encoded).expect("decoded");
    assert_eq!(image.extension, "jpg");
    assert_eq!(image.bytes, b"not really a jpeg");
}

#[test]
fn bare_base64_is_sniffed() {
    let image = decode_image(&STANDARD.encode(PNG_HEADER)).expect("decoded");
    assert_eq!(image.extension, "png");
}

#[test]
fn non_images_are_rejected() {
    let text = format!("data:text/plain;base64,{}", STANDARD.encode(b"hello"));
    assert!(matches!(decode_image(&text), Err(AppError::Validation(_))));

    let unknown = STANDARD.encode(b"plain bytes");
    assert!(matches!(decode_image(&unknown), Err(AppError::Validation(_))));

    assert!(matches!(
        decode_image("data:image/png;base64,@@@"),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        decode_image("data:image/png,abc"),
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn saved_image_lands_under_media_root() {
    let root = std::env::temp_dir().join(format!("foodgram-media-{}", uuid::Uuid::new_v4()));
    let root = root.to_string_lossy().into_owned();
    let image = decode_image(&STANDARD.encode(PNG_HEADER)).expect("decoded");

    let relative = save_image(&root, &image).await.expect("saved");
    assert!(relative.starts_with("recipes/images/"));
    assert!(relative.ends_with(".png"));

    let stored = std::path::Path::new(&root).join(&relative);
    assert_eq!(tokio::fs::read(&stored).await.expect("read back"), PNG_HEADER);

    remove_image(&root, &relative).await;
    assert!(!stored.exists());
    let _ = tokio::fs::remove_dir_all(&root).await;
}
