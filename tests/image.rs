extern crate env_logger;
extern crate image;
extern crate pigment;
extern crate tempfile;

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use pigment::prelude::*;
use tempfile::TempDir;

const IMAGE1: &str = "images/image1.gif";
const IMAGE2: &str = "images/image2.gif";
const IMAGE_100X50: &str = "images/test-100x50.png";
const IMAGE_50X100: &str = "images/test-50x100.png";

fn encode(width: u32, height: u32, rgba: [u8; 4], format: image::ImageFormat) -> Vec<u8> {
    let buffer = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut cursor = Cursor::new(Vec::new());
    buffer.write_to(&mut cursor, format).unwrap();
    cursor.into_inner()
}

fn write_fixtures(root: &Path) {
    fs::create_dir_all(root.join("images")).unwrap();

    let files = [
        (IMAGE1, encode(58, 12, [255, 0, 0, 255], image::ImageFormat::Gif)),
        (IMAGE2, encode(16, 16, [0, 255, 0, 255], image::ImageFormat::Gif)),
        (IMAGE_100X50, encode(100, 50, [0, 0, 255, 255], image::ImageFormat::Png)),
        (IMAGE_50X100, encode(50, 100, [0, 0, 255, 128], image::ImageFormat::Png)),
    ];

    for (name, bytes) in files.iter() {
        fs::write(root.join(name), bytes).unwrap();
    }
}

fn testbed() -> (TempDir, ImageSystem) {
    let _ = env_logger::try_init();

    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let mut search_path = SearchPath::new();
    search_path
        .mount("res", Directory::new(dir.path()).unwrap())
        .unwrap();

    let registry = Arc::new(ResourceRegistry::new(MemoryStorage::default()));
    (dir, ImageSystem::new(registry, search_path))
}

fn stream_of(dir: &TempDir, name: &str) -> Cursor<Vec<u8>> {
    Cursor::new(fs::read(dir.path().join(name)).unwrap())
}

fn construct(images: &ImageSystem, device: &Device, dir: &TempDir, name: &str) -> ImageHandle {
    let mut stream = stream_of(dir, name);
    images
        .construct(Some(device), ImageSource::Stream(&mut stream))
        .unwrap()
}

#[test]
fn image_finder() {
    let (_dir, images) = testbed();
    let registry = images.registry().clone();
    assert!(registry.is_empty());

    assert!(!registry.is_registered(IMAGE1));
    let image1 = images.get_image(IMAGE1).unwrap();
    assert!(registry.is_registered(IMAGE1));
    assert_eq!(images.resource_name(image1).unwrap(), IMAGE1);

    let image2 = images.get_image(IMAGE1).unwrap();
    assert_eq!(image1, image2);
    assert_eq!(
        images.location(image1).unwrap(),
        images.location(image2).unwrap()
    );
    assert_eq!(registry.len(), 1);

    // another picture
    images.get_image(IMAGE2).unwrap();
    assert!(registry.is_registered(IMAGE2));
    assert_eq!(registry.len(), 2);

    // ... and do it again...
    assert_eq!(images.get_image(IMAGE1).unwrap(), image1);
    assert_eq!(registry.len(), 2);
}

#[test]
fn image_finder_persists_under_logical_name() {
    let (dir, _) = testbed();
    let context = tempfile::tempdir().unwrap();

    let mut search_path = SearchPath::new();
    search_path
        .mount("res", Directory::new(dir.path()).unwrap())
        .unwrap();

    let storage = DiskStorage::new(context.path(), "resources").unwrap();
    let registry = Arc::new(ResourceRegistry::new(storage));
    let images = ImageSystem::new(registry.clone(), search_path);

    let image = images.get_image(IMAGE1).unwrap();
    assert!(registry.is_registered(IMAGE1));
    assert_eq!(
        registry.content_path(IMAGE1).unwrap(),
        images.location(image).unwrap()
    );
    assert!(context.path().join("resources").join(IMAGE1).is_file());
    assert_eq!(registry.names(), vec![IMAGE1]);
}

#[test]
fn image_finder_with_colliding_names() {
    let (_dir, images) = testbed();
    let image = images.get_image(IMAGE1).unwrap();

    // Same logical name, but another file with other content.
    let other = Memory::new();
    other
        .insert(IMAGE1, encode(3, 3, [1, 2, 3, 255], image::ImageFormat::Png))
        .unwrap();

    let shadow = images.get_image_with(IMAGE1, &other).unwrap();
    assert!(image != shadow);
    assert_eq!(images.bounds(shadow).unwrap(), Rect::new(0, 0, 3, 3));

    let resource = images.resource_name(shadow).unwrap();
    assert!(resource != IMAGE1);
    assert!(resource.ends_with(IMAGE1));
    assert!(images.registry().is_registered(&resource));

    // The first registration is untouched.
    assert_eq!(images.resource_name(image).unwrap(), IMAGE1);
    let bytes = images.registry().read(IMAGE1).unwrap();
    assert_eq!(ImageData::from_reader(&bytes[..]).unwrap().width(), 58);
}

#[test]
fn image_finder_normalizes_names() {
    let (dir, images) = testbed();

    let image = images.get_image(IMAGE1).unwrap();
    assert_eq!(images.get_image("./images/../images/image1.gif").unwrap(), image);
    assert_eq!(images.get_image("/images//image1.gif").unwrap(), image);

    // A different root, and a different name, but the same file.
    let sub = Directory::new(dir.path().join("images")).unwrap();
    assert_eq!(images.get_image_with("image1.gif", &sub).unwrap(), image);
    assert_eq!(images.len(), 1);
}

#[test]
fn image_finder_with_vfs() {
    let (_dir, images) = testbed();

    let other = tempfile::tempdir().unwrap();
    fs::write(
        other.path().join("test.gif"),
        encode(8, 8, [0, 0, 0, 255], image::ImageFormat::Gif),
    )
    .unwrap();

    let err = images.get_image("test.gif").unwrap_err();
    assert!(err.is_argument_error());

    let vfs = Directory::new(other.path()).unwrap();
    let image = images.get_image_with("test.gif", &vfs).unwrap();
    assert_eq!(images.origin(image).unwrap(), Origin::Factory);
    assert_eq!(images.get_image_with("test.gif", &vfs).unwrap(), image);

    // The filesystem does not fall back to the search path.
    let err = images.get_image_with(IMAGE1, &vfs).unwrap_err();
    assert!(!err.is_argument_error());
}

#[test]
fn image_finder_with_stream() {
    let (dir, images) = testbed();
    assert!(images.get_image("testIS.gif").is_err());

    let mut stream = stream_of(&dir, IMAGE1);
    let image = images.get_image_from("testIS.gif", &mut stream).unwrap();
    assert_eq!(images.bounds(image).unwrap(), Rect::new(0, 0, 58, 12));
    assert_eq!(images.origin(image).unwrap(), Origin::Factory);

    // Known names do not touch the stream at all.
    let mut garbage = Cursor::new(vec![0u8; 12]);
    let again = images.get_image_from("testIS.gif", &mut garbage).unwrap();
    assert_eq!(image, again);
    assert_eq!(garbage.position(), 0);
}

#[test]
fn find_with_illegal_arguments() {
    let (_dir, images) = testbed();

    assert!(images.get_image("").unwrap_err().is_argument_error());
    assert!(images.get_image("   ").unwrap_err().is_argument_error());
    assert!(images.get_image("../image1.gif").unwrap_err().is_argument_error());

    let mut stream = Cursor::new(vec![0u8; 1]);
    let err = images.get_image_from("", &mut stream).unwrap_err();
    assert!(err.is_argument_error());
}

#[test]
fn image_bounds() {
    let (_dir, images) = testbed();

    let image_100x50 = images.get_image(IMAGE_100X50).unwrap();
    assert_eq!(images.bounds(image_100x50).unwrap(), Rect::new(0, 0, 100, 50));

    let image_50x100 = images.get_image(IMAGE_50X100).unwrap();
    assert_eq!(images.bounds(image_50x100).unwrap(), Rect::new(0, 0, 50, 100));
}

#[test]
fn undecodable_image() {
    let (dir, images) = testbed();
    fs::write(dir.path().join("images/broken.gif"), [0u8; 12]).unwrap();

    let err = images.get_image("images/broken.gif").unwrap_err();
    assert!(err.is_unsupported_format());
    assert!(images.is_empty());
    assert!(images.registry().is_empty());
}

#[test]
fn constructor_with_null_device() {
    let (_dir, images) = testbed();
    Device::clear_current();

    let mut stream = Cursor::new(Vec::new());
    let err = images
        .construct(None, ImageSource::Stream(&mut stream))
        .unwrap_err();
    assert!(err.is_argument_error());
}

#[test]
fn constructor_uses_current_device() {
    let (dir, images) = testbed();
    let device = Device::new();
    device.make_current();

    let mut stream = stream_of(&dir, IMAGE1);
    let image = images
        .construct(None, ImageSource::Stream(&mut stream))
        .unwrap();
    assert_eq!(images.image_device(image).unwrap(), device);

    let path = dir.path().join(IMAGE1);
    let image = images.construct(None, ImageSource::File(&path)).unwrap();
    assert_eq!(images.image_device(image).unwrap(), device);

    Device::clear_current();
}

#[test]
fn stream_constructor() {
    let (dir, images) = testbed();
    let device = Device::new();

    let image = construct(&images, &device, &dir, IMAGE1);
    assert_eq!(images.bounds(image).unwrap(), Rect::new(0, 0, 58, 12));
    assert_eq!(images.origin(image).unwrap(), Origin::User);
}

#[test]
fn stream_constructor_with_illegal_image() {
    let (_dir, images) = testbed();
    let device = Device::new();

    let mut stream = Cursor::new(vec![0u8; 12]);
    let err = images
        .construct(Some(&device), ImageSource::Stream(&mut stream))
        .unwrap_err();
    assert!(err.is_unsupported_format());
}

#[test]
fn file_constructor() {
    let (dir, images) = testbed();
    let device = Device::new();

    let path = dir.path().join(IMAGE1);
    let image = images
        .construct(Some(&device), ImageSource::File(&path))
        .unwrap();
    assert_eq!(images.bounds(image).unwrap(), Rect::new(0, 0, 58, 12));

    let missing = dir.path().join("images/missing.gif");
    let err = images
        .construct(Some(&device), ImageSource::File(&missing))
        .unwrap_err();
    assert!(err.is_argument_error());
}

#[test]
fn image_constructor() {
    let (dir, images) = testbed();
    let device = Device::new();

    let image = construct(&images, &device, &dir, IMAGE1);
    let copied = images
        .construct(Some(&device), ImageSource::Image(image, CopyMode::Copy))
        .unwrap();

    assert_eq!(images.bounds(image).unwrap(), images.bounds(copied).unwrap());
    assert_eq!(
        images.image_data(image).unwrap(),
        images.image_data(copied).unwrap()
    );
    assert!(images.resource_name(image).unwrap() != images.resource_name(copied).unwrap());

    images.dispose(image).unwrap();
    assert!(images.is_disposed(image));
    assert!(!images.is_disposed(copied));
}

#[test]
fn image_constructor_with_copy_modes() {
    let (dir, images) = testbed();
    let device = Device::new();
    let image = construct(&images, &device, &dir, IMAGE_100X50);

    let gray = images
        .construct(Some(&device), ImageSource::Image(image, CopyMode::Gray))
        .unwrap();
    let data = images.image_data(gray).unwrap();
    assert_eq!(data.pixel(0, 0), Some([29, 29, 29, 255]));
    assert_eq!(images.bounds(gray).unwrap(), Rect::new(0, 0, 100, 50));

    let disabled = images
        .construct(
            Some(&device),
            ImageSource::Image(image, CopyMode::from_bits(CopyMode::DISABLE).unwrap()),
        )
        .unwrap();
    assert!(images.image_data(disabled).unwrap() != data);

    // Factory images can be copied too, the copy is owned by the caller.
    let shared = images.get_image(IMAGE2).unwrap();
    let copied = images
        .construct(Some(&device), ImageSource::Image(shared, CopyMode::Copy))
        .unwrap();
    assert_eq!(images.origin(copied).unwrap(), Origin::User);
    images.dispose(copied).unwrap();
}

#[test]
fn image_constructor_with_illegal_arguments() {
    let (dir, images) = testbed();
    let device = Device::new();
    let image = construct(&images, &device, &dir, IMAGE1);

    let err = images
        .construct(
            Some(&device),
            ImageSource::Image(ImageHandle::nil(), CopyMode::Copy),
        )
        .unwrap_err();
    assert!(err.is_argument_error());

    assert!(CopyMode::from_bits(8).unwrap_err().is_argument_error());

    images.dispose(image).unwrap();
    let err = images
        .construct(Some(&device), ImageSource::Image(image, CopyMode::Copy))
        .unwrap_err();
    assert!(err.is_illegal_state());
}

#[test]
fn image_data_constructor() {
    let (dir, images) = testbed();
    let device = Device::new();

    let data = ImageData::from_reader(stream_of(&dir, IMAGE_100X50)).unwrap();
    let image = images
        .construct(Some(&device), ImageSource::Data(&data))
        .unwrap();

    let bounds = images.bounds(image).unwrap();
    assert_eq!(bounds.width, 100);
    assert_eq!(bounds.height, 50);

    let registry = images.registry();
    let bytes = registry.read(images.resource_name(image).unwrap()).unwrap();
    assert_eq!(ImageData::from_reader(&bytes[..]).unwrap(), data);
}

#[test]
fn dispose() {
    let (dir, images) = testbed();
    let device = Device::new();

    let mut stream = stream_of(&dir, IMAGE1);
    let image = images
        .construct(Some(&device), ImageSource::Stream(&mut stream))
        .unwrap();
    assert_eq!(images.len(), 1);

    images.dispose(image).unwrap();
    assert!(images.is_disposed(image));
    assert!(images.is_empty());
    assert!(images.image_data(image).unwrap_err().is_illegal_state());
    assert!(images.bounds(image).unwrap_err().is_illegal_state());
    assert!(images.dispose(image).unwrap_err().is_illegal_state());

    // The stream is still owned, and usable, by the caller.
    let mut rest = Vec::new();
    assert_eq!(stream.read_to_end(&mut rest).unwrap(), 0);
}

#[test]
fn dispose_keeps_registration() {
    let (dir, images) = testbed();
    let device = Device::new();

    let image = construct(&images, &device, &dir, IMAGE1);
    let resource = images.resource_name(image).unwrap();
    let location = images.location(image).unwrap();

    images.dispose(image).unwrap();
    assert!(images.registry().is_registered(&resource));
    assert_eq!(images.registry().content_path(&resource).unwrap(), location);
}

#[test]
fn handles_of_other_systems() {
    let (dir, images) = testbed();
    let (_other_dir, other) = testbed();
    assert!(images.id() != other.id());

    let image = images.get_image(IMAGE1).unwrap();
    let foreign = other.get_image(IMAGE_100X50).unwrap();
    assert_eq!(image.system(), images.id());

    assert!(images.bounds(foreign).unwrap_err().is_argument_error());
    assert!(images.image_data(foreign).unwrap_err().is_argument_error());
    assert!(images.dispose(foreign).unwrap_err().is_argument_error());
    assert!(images.is_disposed(foreign));
    assert!(!other.is_disposed(foreign));

    let device = Device::new();
    let user = construct(&other, &device, &dir, IMAGE1);
    let err = images
        .construct(Some(&device), ImageSource::Image(user, CopyMode::Copy))
        .unwrap_err();
    assert!(err.is_argument_error());
    assert!(images.dispose(user).unwrap_err().is_argument_error());
    assert!(!other.is_disposed(user));
}

#[test]
fn disposed_handle_is_never_reused() {
    let (dir, images) = testbed();
    let device = Device::new();

    let image = construct(&images, &device, &dir, IMAGE1);
    images.dispose(image).unwrap();

    let other = construct(&images, &device, &dir, IMAGE1);
    assert!(image != other);
    assert!(images.is_disposed(image));
    assert!(images.image_data(image).is_err());
    assert!(images.image_data(other).is_ok());
}

#[test]
fn dispose_factory_created() {
    let (_dir, images) = testbed();

    let image = images.get_image(IMAGE1).unwrap();
    let err = images.dispose(image).unwrap_err();
    assert!(err.is_illegal_state());
    assert!(!images.is_disposed(image));
    assert!(images.image_data(image).is_ok());
}

#[test]
fn equality() {
    let (dir, images) = testbed();

    let image1 = images.get_image(IMAGE1).unwrap();
    let image2 = images.get_image(IMAGE1).unwrap();
    let another = images.get_image(IMAGE2).unwrap();
    assert!(image1 == image2);
    assert!(image1 != another);

    let device = Device::new();
    let image1 = construct(&images, &device, &dir, IMAGE1);
    let image2 = construct(&images, &device, &dir, IMAGE1);
    assert!(image1 != image2);
    assert_eq!(
        images.image_data(image1).unwrap(),
        images.image_data(image2).unwrap()
    );

    let image1 = construct(&images, &device, &dir, IMAGE1);
    let image2 = images.get_image(IMAGE1).unwrap();
    assert!(image1 != image2);
}

#[test]
fn get_image_data() {
    let (dir, images) = testbed();
    let device = Device::new();

    let data = ImageData::from_reader(stream_of(&dir, IMAGE_100X50)).unwrap();
    let image = images
        .construct(Some(&device), ImageSource::Data(&data))
        .unwrap();

    let snapshot = images.image_data(image).unwrap();
    assert_eq!(snapshot.width(), 100);
    assert_eq!(snapshot.height(), 50);

    images.dispose(image).unwrap();
    assert_eq!(snapshot.pixel(99, 49), Some([0, 0, 255, 255]));
}

#[test]
fn set_background() {
    let (dir, images) = testbed();
    let device = Device::new();
    let image = construct(&images, &device, &dir, IMAGE_100X50);
    assert_eq!(images.background(image).unwrap(), None);

    let color = device.create_color([1, 2, 3]);
    images.set_background(image, color).unwrap();
    assert_eq!(images.background(image).unwrap(), Some(RGB::new(1, 2, 3)));

    // Factory images are owned by the device of the image system.
    let shared = images.get_image(IMAGE1).unwrap();
    let color = images.device().create_color([4, 5, 6]);
    images.set_background(shared, color).unwrap();
    assert_eq!(images.background(shared).unwrap(), Some(RGB::new(4, 5, 6)));
}

#[test]
fn set_background_when_disposed() {
    let (dir, images) = testbed();
    let device = Device::new();
    let image = construct(&images, &device, &dir, IMAGE_100X50);
    images.dispose(image).unwrap();

    let color = device.create_color([0, 0, 0]);
    let err = images.set_background(image, color).unwrap_err();
    assert!(err.is_illegal_state());
}

#[test]
fn set_background_with_disposed_color() {
    let (dir, images) = testbed();
    let device = Device::new();
    let image = construct(&images, &device, &dir, IMAGE_100X50);

    let color = device.create_color([0, 0, 0]);
    device.dispose_color(color).unwrap();

    let err = images.set_background(image, color).unwrap_err();
    assert!(err.is_argument_error());
    assert_eq!(images.background(image).unwrap(), None);
}

#[test]
fn set_background_with_null_color() {
    let (dir, images) = testbed();
    let device = Device::new();
    let image = construct(&images, &device, &dir, IMAGE_100X50);

    let err = images
        .set_background(image, ColorHandle::nil())
        .unwrap_err();
    assert!(err.is_argument_error());

    let other = Device::new().create_color([0, 0, 0]);
    let err = images.set_background(image, other).unwrap_err();
    assert!(err.is_argument_error());
}
