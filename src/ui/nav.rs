//! Header navigation targets, in page order.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    /// Element id of the section the link scrolls to.
    pub id: &'static str,
}

impl NavItem {
    const fn new(label: &'static str, id: &'static str) -> Self {
        Self { label, id }
    }

    pub fn href(self) -> String {
        format!("#{}", self.id)
    }
}

pub const NAV_ITEMS: [NavItem; 9] = [
    NavItem::new("Home", "home"),
    NavItem::new("About", "about"),
    NavItem::new("Skills", "skills"),
    NavItem::new("Projects", "projects"),
    NavItem::new("Experience", "experience"),
    NavItem::new("Education", "education"),
    NavItem::new("Certifications", "certifications"),
    NavItem::new("Testimonials", "testimonials"),
    NavItem::new("Contact", "contact"),
];
