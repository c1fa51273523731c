//! Collection tree traversal

use oasify_parser::postman::{Auth, AuthKind, Collection, Example, Item, Request, RequestItem};

/// A request leaf as seen by a visitor
#[derive(Debug, Clone)]
pub struct Leaf<'a> {
    /// The leaf node
    pub item: &'a RequestItem,

    /// The leaf's request
    pub request: &'a Request,

    /// First saved example, if any
    pub example: Option<&'a Example>,

    /// Folder names joined with `/`, empty at the root
    pub label: String,

    /// Name of the top-level folder containing the leaf
    pub top_folder: Option<&'a str>,

    /// Effective auth: the request's own, else the nearest folder's, else
    /// the collection's; `None` when that resolves to `noauth`
    pub auth: Option<&'a Auth>,
}

impl Leaf<'_> {
    /// Leaf name
    pub fn name(&self) -> &str {
        &self.item.name
    }
}

/// Visit every request leaf depth-first, in document order
///
/// Leaves without a request (empty folders) are not visited.
pub fn walk<'a, F>(collection: &'a Collection, mut visit: F)
where
    F: FnMut(Leaf<'a>),
{
    visit_items(
        &collection.item,
        "",
        None,
        collection.auth.as_ref(),
        &mut visit,
    );
}

fn visit_items<'a, F>(
    items: &'a [Item],
    label: &str,
    top_folder: Option<&'a str>,
    inherited_auth: Option<&'a Auth>,
    visit: &mut F,
) where
    F: FnMut(Leaf<'a>),
{
    for item in items {
        match item {
            Item::Folder(folder) => {
                let folder_label = if label.is_empty() {
                    folder.name.clone()
                } else {
                    format!("{}/{}", label, folder.name)
                };
                visit_items(
                    &folder.items,
                    &folder_label,
                    top_folder.or(Some(folder.name.as_str())),
                    folder.auth.as_ref().or(inherited_auth),
                    visit,
                );
            }
            Item::Request(leaf) => {
                let Some(request) = leaf.request.as_ref() else {
                    continue;
                };
                let auth = request
                    .auth
                    .as_ref()
                    .or(inherited_auth)
                    .filter(|auth| auth.kind != AuthKind::NoAuth);

                visit(Leaf {
                    item: leaf,
                    request,
                    example: leaf.first_example(),
                    label: label.to_string(),
                    top_folder,
                    auth,
                });
            }
        }
    }
}
