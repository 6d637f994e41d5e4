pub struct NodeListIterator {
    list: web_sys::NodeList,
    index: u32,
}

// Cannot implement `IntoIterator` for `NodeList` because both the trait and the struct are
// foreign.
impl From<web_sys::NodeList> for NodeListIterator {
    fn from(list: web_sys::NodeList) -> Self { Self { list, index: 0 } }
}

impl Iterator for NodeListIterator {
    type Item = web_sys::Node;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.list.item(self.index);
        self.index += 1;
        item
    }
}
