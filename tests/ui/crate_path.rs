use dynvar as rt;
use dynvar_macros::{dynamic_variant, TreeCodec};

#[derive(TreeCodec)]
#[tree_codec(crate = "rt")]
struct Point(i32, i32);

#[dynamic_variant(codec, crate = "rt")]
enum Shape {
    Point,
    #[variant(from(u8))]
    Radius(u32),
}

fn main() {
    let shape = rt::Variant::<Shape>::from_value(3u8);
    assert_eq!(shape.get::<u32>(), Some(&3));
    let point = rt::Variant::<Shape>::new(Point(1, -1));
    assert!(rt::codec::encode(&point).is_ok());
}
