use dynvar::Variant;
use dynvar_macros::{dynamic_variant, TreeCodec};

#[derive(Debug, Clone, TreeCodec)]
pub struct Empty;

#[derive(Debug, Clone, TreeCodec)]
pub struct Node<T> {
    head: T,
    tail: List<T>,
}

#[dynamic_variant(codec)]
#[derive(Debug, Clone)]
pub enum ListAlternatives<T> {
    Empty,
    Node(Box<Node<T>>),
}

pub type List<T> = Variant<ListAlternatives<T>>;

fn main() {
    let list: List<String> = List::new(Node {
        head: String::from("a"),
        tail: List::new(Empty),
    });
    let tree = dynvar::codec::encode(&list).unwrap();
    let decoded: List<String> = dynvar::codec::decode(&tree).unwrap();
    assert!(decoded.holds::<Node<String>>());
}
