//! Head element classification (stable partition).

use crate::config::AlternatePolicy;
use crate::tag::HeadElement;

const CSS_SUFFIX: &str = ".css";
const RTL_CSS_SUFFIX: &str = ".rtl.css";

/// Where an element ends up after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Stays in the head as-is.
    Keep,
    /// Base stylesheet: removed and recreated by the runtime script.
    Stylesheet,
    /// Alternate stylesheet removed under [`AlternatePolicy::Drop`].
    Drop,
}

/// `<link>` whose href ends in `.css` but not `.rtl.css`.
pub fn is_base_stylesheet(elem: &HeadElement) -> bool {
    elem.is("link")
        && elem
            .href()
            .is_some_and(|href| href.ends_with(CSS_SUFFIX) && !href.ends_with(RTL_CSS_SUFFIX))
}

/// `<link>` whose href ends in `.rtl.css`.
pub fn is_alternate_stylesheet(elem: &HeadElement) -> bool {
    elem.is("link") && elem.href().is_some_and(|href| href.ends_with(RTL_CSS_SUFFIX))
}

pub fn disposition(elem: &HeadElement, policy: AlternatePolicy) -> Disposition {
    if is_base_stylesheet(elem) {
        Disposition::Stylesheet
    } else if policy == AlternatePolicy::Drop && is_alternate_stylesheet(elem) {
        Disposition::Drop
    } else {
        Disposition::Keep
    }
}

/// Result of [`classify`]; each list keeps input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub untouched: Vec<HeadElement>,
    pub stylesheets: Vec<HeadElement>,
    /// Always empty under [`AlternatePolicy::Keep`].
    pub dropped: Vec<HeadElement>,
}

/// Split the head sequence. Every input element lands in exactly one list.
pub fn classify(head: Vec<HeadElement>, policy: AlternatePolicy) -> Classification {
    let mut out = Classification::default();
    for elem in head {
        match disposition(&elem, policy) {
            Disposition::Keep => out.untouched.push(elem),
            Disposition::Stylesheet => out.stylesheets.push(elem),
            Disposition::Drop => out.dropped.push(elem),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Attrs;

    fn link(href: &str) -> HeadElement {
        HeadElement::new("link", Attrs::from([("href", href), ("rel", "stylesheet")]))
    }

    fn elem(tag: &str) -> HeadElement {
        HeadElement::new(tag, Attrs::new())
    }

    fn hrefs(elems: &[HeadElement]) -> Vec<&str> {
        elems.iter().map(|e| e.href().unwrap_or(e.tag_name.as_str())).collect()
    }

    #[test]
    fn test_base_stylesheet_detection() {
        assert!(is_base_stylesheet(&link("style.css")));
        assert!(is_base_stylesheet(&link("/static/app.3f2a.css")));
        assert!(is_base_stylesheet(&HeadElement::new("LINK", Attrs::from([("href", "a.css")]))));
        assert!(!is_base_stylesheet(&link("style.rtl.css")));
        assert!(!is_base_stylesheet(&link("style.css?v=1")));
        assert!(!is_base_stylesheet(&link("favicon.ico")));
        assert!(!is_base_stylesheet(&elem("link")));
        assert!(!is_base_stylesheet(&HeadElement::new(
            "script",
            Attrs::from([("href", "x.css")])
        )));
    }

    #[test]
    fn test_stable_partition() {
        let head = vec![
            elem("meta"),
            link("a.css"),
            elem("title"),
            link("b.rtl.css"),
            link("c.css"),
            elem("script"),
        ];
        let out = classify(head.clone(), AlternatePolicy::Keep);

        assert_eq!(hrefs(&out.stylesheets), ["a.css", "c.css"]);
        assert_eq!(hrefs(&out.untouched), ["meta", "title", "b.rtl.css", "script"]);
        assert!(out.dropped.is_empty());

        // Nothing lost or duplicated
        assert_eq!(out.untouched.len() + out.stylesheets.len(), head.len());
        for e in &head {
            let found = out.untouched.iter().chain(&out.stylesheets).filter(|x| *x == e).count();
            assert_eq!(found, 1);
        }
    }

    #[test]
    fn test_classify_is_idempotent_on_untouched() {
        let head = vec![link("a.css"), elem("meta"), link("a.rtl.css"), link("b.css")];
        let first = classify(head, AlternatePolicy::Keep);
        let second = classify(first.untouched.clone(), AlternatePolicy::Keep);
        assert_eq!(second.untouched, first.untouched);
        assert!(second.stylesheets.is_empty());
    }

    #[test]
    fn test_empty_head() {
        let out = classify(Vec::new(), AlternatePolicy::Keep);
        assert_eq!(out, Classification::default());
    }

    #[test]
    fn test_drop_policy_removes_alternates() {
        let head = vec![link("a.css"), link("a.rtl.css"), elem("meta")];
        let out = classify(head, AlternatePolicy::Drop);
        assert_eq!(hrefs(&out.stylesheets), ["a.css"]);
        assert_eq!(hrefs(&out.dropped), ["a.rtl.css"]);
        assert_eq!(hrefs(&out.untouched), ["meta"]);
    }
}
