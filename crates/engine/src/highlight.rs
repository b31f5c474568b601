use crate::settings::HighlightMarker;
use browse_protocol::BrowseItem;

/// Presentation pass over a finished window.
///
/// | highlight | expandAll | anchor value | isAnchor | record |
/// |-----------|-----------|--------------|----------|--------|
/// | yes       | no        | wrapped      | set      | omitted |
/// | yes       | yes       | plain        | set      | kept   |
/// | no        | any       | plain        | cleared  | kept with expandAll |
pub struct Highlighter<'a> {
    marker: &'a HighlightMarker,
}

impl<'a> Highlighter<'a> {
    pub fn new(marker: &'a HighlightMarker) -> Self {
        Self { marker }
    }

    pub fn apply<R>(&self, items: &mut [BrowseItem<R>], highlight_match: bool, expand_all: bool) {
        for item in items.iter_mut() {
            if !expand_all {
                item.record = None;
            }
            if !highlight_match {
                item.is_anchor = false;
            } else if item.is_anchor && !expand_all {
                item.value = self.marker.wrap(&item.value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn window() -> Vec<BrowseItem<u32>> {
        let mut anchor = BrowseItem::new("B".into(), "b".into(), 2, None, 2);
        anchor.is_anchor = true;
        vec![BrowseItem::new("A".into(), "a".into(), 1, None, 1), anchor]
    }

    #[test]
    fn narrow_mode_marks_anchor() {
        let marker = HighlightMarker::default();
        let mut items = window();
        Highlighter::new(&marker).apply(&mut items, true, false);
        assert_eq!(items[1].value, "<mark>b</mark>");
        assert!(items[1].is_anchor);
        assert_eq!(items[0].value, "a");
        assert!(items.iter().all(|item| item.record.is_none()));
    }

    #[test]
    fn expand_all_keeps_records_without_markup() {
        let marker = HighlightMarker::default();
        let mut items = window();
        Highlighter::new(&marker).apply(&mut items, true, true);
        assert_eq!(items[1].value, "b");
        assert!(items[1].is_anchor);
        assert_eq!(items[1].record, Some(2));
    }

    #[test]
    fn no_highlight_clears_flag() {
        let marker = HighlightMarker::default();
        let mut items = window();
        Highlighter::new(&marker).apply(&mut items, false, true);
        assert!(items.iter().all(|item| !item.is_anchor));
        assert_eq!(items[1].value, "b");
    }
}
