#![cfg(feature = "text")]

use treap_rope::Rope;

#[test]
fn text_round_trip() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rope = Rope::from("hello");
    let (mut left, mut right) = rope.split(2);
    assert_eq!("he", left.to_string());
    assert_eq!("llo", right.to_string());
    left.concat(&mut right);
    rope = left;
    rope.insert_str(5, ", world").unwrap();
    assert_eq!("hello, world", rope.to_string());
    assert_eq!(Ok("lo, w".to_string()), rope.substring(3..8));
    assert_eq!(Rope::from("abc"), Rope::from(vec!['a', 'b', 'c']));
}
