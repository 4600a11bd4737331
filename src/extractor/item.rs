/// A fully matched item record
///
/// Items are only built by the matcher, once the id, image and a qualifying link have been
/// seen in that order. They cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    id: String,
    image_ref: String,
    page_ref: String,
    title: String,
}

impl Item {
    pub(crate) fn new(id: String, image_ref: String, page_ref: String, title: String) -> Self {
        Self {
            id,
            image_ref,
            page_ref,
            title,
        }
    }

    /// Label of the section the item was found in
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Image location, exactly as written in the markup
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    /// Destination link; always starts with the configured absolute prefix
    pub fn page_ref(&self) -> &str {
        &self.page_ref
    }

    /// Link title, empty when the anchor carried none
    pub fn title(&self) -> &str {
        &self.title
    }
}
