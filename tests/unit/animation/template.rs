use std::borrow::Cow;

use super::*;

const RED: [u8; 3] = [255, 0, 0];
const BLUE: [u8; 3] = [0, 0, 255];

struct RawFrame {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    color: [u8; 3],
    delay_cs: u16,
    dispose: gif::DisposalMethod,
}

fn encode(width: u16, height: u16, frames: &[RawFrame]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut enc = gif::Encoder::new(&mut out, width, height, &[]).unwrap();
        for f in frames {
            let mut frame = gif::Frame::default();
            frame.left = f.left;
            frame.top = f.top;
            frame.width = f.width;
            frame.height = f.height;
            frame.delay = f.delay_cs;
            frame.dispose = f.dispose;
            frame.palette = Some(f.color.to_vec());
            frame.buffer = Cow::Owned(vec![0u8; usize::from(f.width) * usize::from(f.height)]);
            enc.write_frame(&frame).unwrap();
        }
    }
    out
}

#[test]
fn background_disposal_clears_previous_rect() {
    let bytes = encode(
        4,
        4,
        &[
            RawFrame {
                left: 0,
                top: 0,
                width: 4,
                height: 4,
                color: RED,
                delay_cs: 5,
                dispose: gif::DisposalMethod::Background,
            },
            RawFrame {
                left: 1,
                top: 1,
                width: 2,
                height: 2,
                color: BLUE,
                delay_cs: 7,
                dispose: gif::DisposalMethod::Keep,
            },
        ],
    );

    let anim = TemplateAnimation::decode(bytes.as_slice()).unwrap();
    assert_eq!((anim.width, anim.height), (4, 4));
    assert_eq!(anim.frames.len(), 2);
    assert_eq!(anim.frames[0].delay_ms, 50);
    assert_eq!(anim.frames[1].delay_ms, 70);
    assert_eq!(anim.frames[0].disposal, Disposal::Background);

    let second = &anim.frames[1].image;
    assert_eq!(*second.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    assert_eq!(*second.get_pixel(1, 1), Rgba([0, 0, 255, 255]));
}

#[test]
fn keep_disposal_layers_frames() {
    let bytes = encode(
        4,
        4,
        &[
            RawFrame {
                left: 0,
                top: 0,
                width: 4,
                height: 4,
                color: RED,
                delay_cs: 0,
                dispose: gif::DisposalMethod::Keep,
            },
            RawFrame {
                left: 2,
                top: 2,
                width: 2,
                height: 2,
                color: BLUE,
                delay_cs: 10,
                dispose: gif::DisposalMethod::Keep,
            },
        ],
    );

    let anim = TemplateAnimation::decode(bytes.as_slice()).unwrap();
    assert_eq!(anim.frames[0].delay_ms, DEFAULT_DELAY_MS);
    let second = &anim.frames[1].image;
    assert_eq!(*second.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    assert_eq!(*second.get_pixel(3, 3), Rgba([0, 0, 255, 255]));
    assert_eq!(anim.total_duration_ms(), 200);
}

#[test]
fn garbage_is_a_decode_error() {
    let err = TemplateAnimation::decode(&b"not a gif"[..]).unwrap_err();
    assert!(matches!(err, BoilerError::Decode(_)));
}

#[test]
fn missing_file_is_a_decode_error() {
    let err = TemplateAnimation::open(Path::new("definitely/not/here.gif")).unwrap_err();
    assert!(matches!(err, BoilerError::Decode(_)));
}

#[test]
fn from_frames_rejects_empty_and_mismatched() {
    assert!(TemplateAnimation::from_frames(vec![]).is_err());

    let a = TemplateFrame {
        image: RgbaImage::new(2, 2),
        delay_ms: 10,
        disposal: Disposal::Keep,
    };
    let b = TemplateFrame {
        image: RgbaImage::new(3, 2),
        ..a.clone()
    };
    assert!(TemplateAnimation::from_frames(vec![a.clone(), b]).is_err());

    let zero = TemplateFrame {
        delay_ms: 0,
        ..a.clone()
    };
    assert!(TemplateAnimation::from_frames(vec![zero]).is_err());
    assert!(TemplateAnimation::from_frames(vec![a]).is_ok());
}
