//! Default-action policy for delegated browser events.
//!
//! The host installs one delegated listener for clicks and one for form
//! submission; both ask this crate whether the browser's default action
//! should be suppressed so the client can handle the event itself.
//!
//! The decision table for clicks:
//!
//! | button    | modifiers | target tag   | opt-out (`_blank`/download) | verdict  |
//! |-----------|-----------|--------------|-----------------------------|----------|
//! | primary   | none      | anchor/image | no                          | Suppress |
//! | primary   | none      | anchor/image | yes                         | Allow    |
//! | primary   | none      | other        | any                         | Allow    |
//! | primary   | any held  | any          | any                         | Allow    |
//! | secondary | any       | any          | any                         | Allow    |
//! | auxiliary | any       | any          | any                         | Allow    |
//!
//! Form submission is always suppressed; the client posts through its own
//! command modules.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during the event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const ALT   = 1 << 0;
        const CTRL  = 1 << 1;
        const META  = 1 << 2;
        const SHIFT = 1 << 3;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Primary,
    Auxiliary,
    Secondary,
}

/// Tag of the element the click landed on, after event delegation walks
/// up from the exact target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetTag {
    Anchor,
    Image,
    Other,
}

/// Facts about the clicked element that the policy needs.
#[derive(Clone, Debug)]
pub struct ClickTarget {
    pub tag: TargetTag,
    /// `target="_blank"`: the page explicitly opted out of interception.
    pub opens_new_tab: bool,
    /// A `download` attribute is present.
    pub download: bool,
    pub href: Option<String>,
}

impl ClickTarget {
    pub fn anchor(href: &str) -> Self {
        Self {
            tag: TargetTag::Anchor,
            opens_new_tab: false,
            download: false,
            href: Some(href.to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Suppress the browser default; the client handles the event.
    Suppress,
    /// Leave the default action alone.
    Allow,
}

pub fn decide_click(button: Button, modifiers: Modifiers, target: &ClickTarget) -> Verdict {
    if button != Button::Primary {
        return Verdict::Allow;
    }
    if !modifiers.is_empty() {
        return Verdict::Allow;
    }
    match target.tag {
        TargetTag::Anchor | TargetTag::Image => {
            if target.opens_new_tab || target.download {
                Verdict::Allow
            } else {
                Verdict::Suppress
            }
        }
        TargetTag::Other => Verdict::Allow,
    }
}

pub fn decide_submit() -> Verdict {
    Verdict::Suppress
}

/// Whether `href`, resolved against `base`, stays on the same origin.
/// Relative links always do; unparseable input is treated as leaving the
/// site so the default action stays intact.
pub fn is_same_site(href: &str, base: &str) -> bool {
    let Ok(base) = url::Url::parse(base) else {
        return false;
    };
    let Ok(resolved) = base.join(href) else {
        return false;
    };
    resolved.scheme() == base.scheme()
        && resolved.host_str() == base.host_str()
        && resolved.port_or_known_default() == base.port_or_known_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_primary_click_on_anchor_is_suppressed() {
        let target = ClickTarget::anchor("/g/");
        assert_eq!(
            decide_click(Button::Primary, Modifiers::empty(), &target),
            Verdict::Suppress
        );
    }

    #[test]
    fn plain_primary_click_on_image_is_suppressed() {
        let target = ClickTarget {
            tag: TargetTag::Image,
            opens_new_tab: false,
            download: false,
            href: None,
        };
        assert_eq!(
            decide_click(Button::Primary, Modifiers::empty(), &target),
            Verdict::Suppress
        );
    }

    #[test]
    fn modified_clicks_pass_through() {
        let target = ClickTarget::anchor("/g/");
        for modifiers in [Modifiers::CTRL, Modifiers::META, Modifiers::SHIFT, Modifiers::ALT] {
            assert_eq!(
                decide_click(Button::Primary, modifiers, &target),
                Verdict::Allow
            );
        }
    }

    #[test]
    fn non_primary_buttons_pass_through() {
        let target = ClickTarget::anchor("/g/");
        assert_eq!(
            decide_click(Button::Auxiliary, Modifiers::empty(), &target),
            Verdict::Allow
        );
        assert_eq!(
            decide_click(Button::Secondary, Modifiers::empty(), &target),
            Verdict::Allow
        );
    }

    #[test]
    fn new_tab_and_download_opt_out() {
        let mut target = ClickTarget::anchor("/src/img.png");
        target.opens_new_tab = true;
        assert_eq!(
            decide_click(Button::Primary, Modifiers::empty(), &target),
            Verdict::Allow
        );

        let mut target = ClickTarget::anchor("/src/img.png");
        target.download = true;
        assert_eq!(
            decide_click(Button::Primary, Modifiers::empty(), &target),
            Verdict::Allow
        );
    }

    #[test]
    fn clicks_on_other_elements_pass_through() {
        let target = ClickTarget {
            tag: TargetTag::Other,
            opens_new_tab: false,
            download: false,
            href: None,
        };
        assert_eq!(
            decide_click(Button::Primary, Modifiers::empty(), &target),
            Verdict::Allow
        );
    }

    #[test]
    fn form_submission_is_always_suppressed() {
        assert_eq!(decide_submit(), Verdict::Suppress);
    }

    #[test]
    fn same_site_resolution() {
        let base = "https://boards.example.net/g/";
        assert!(is_same_site("/a/123", base));
        assert!(is_same_site("thread/42", base));
        assert!(is_same_site("https://boards.example.net/all/", base));
        assert!(!is_same_site("https://elsewhere.example.org/", base));
        assert!(!is_same_site("https://boards.example.net:8443/g/", base));
    }

    #[test]
    fn garbage_input_never_claims_same_site() {
        assert!(!is_same_site("/a/", "not a url"));
    }
}
