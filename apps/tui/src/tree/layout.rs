//! Logical layout of a built tree.
//!
//! Each generation is a row of sibling subtrees. A parent drops a stem to a
//! bar spanning its children, with one drop per child; an only child gets a
//! single straight drop. Units are terminal cells at zoom 1.

use crate::domain::{Gender, Member};
use crate::tree::builder::TreeNode;
use chrono::NaiveDate;
use kurbo::{Point, Rect, Size};

pub const CARD_WIDTH: f64 = 24.0;
pub const CARD_HEIGHT: f64 = 5.0;
pub const MARRIAGE_GAP: f64 = 5.0;
pub const SIBLING_GAP: f64 = 4.0;
/// Rows between a parent's bottom edge and its children's top edge.
pub const LEVEL_GAP: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PersonCard {
    pub member_id: String,
    pub fullname: String,
    pub initial: char,
    pub gender: Gender,
    pub lifespan: String,
    pub age: String,
    pub deceased: bool,
    pub rect: Rect,
}

impl PersonCard {
    fn new(member: &Member, origin: Point, today: NaiveDate) -> Self {
        Self {
            member_id: member.id.clone(),
            fullname: member.fullname.clone(),
            initial: member.initial(),
            gender: member.gender,
            lifespan: member.lifespan_label(),
            age: member.age_label(today),
            deceased: member.has_death_date(),
            rect: Rect::from_origin_size(origin, (CARD_WIDTH, CARD_HEIGHT)),
        }
    }
}

/// A member and optional spouse rendered side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct CoupleCard {
    pub member: PersonCard,
    pub spouse: Option<PersonCard>,
    pub level: usize,
    pub depth: u32,
    pub rect: Rect,
}

impl CoupleCard {
    pub const fn is_root(&self) -> bool {
        self.level == 0
    }

    /// Center of the gap between member and spouse.
    pub fn marriage_marker(&self) -> Option<Point> {
        self.spouse.as_ref().map(|_| {
            Point::new(
                self.member.rect.x1 + MARRIAGE_GAP / 2.0,
                self.rect.y0 + (CARD_HEIGHT / 2.0).floor(),
            )
        })
    }

    pub fn persons(&self) -> impl Iterator<Item = &PersonCard> {
        std::iter::once(&self.member).chain(self.spouse.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    /// Parent down to the sibling bar.
    Stem,
    /// Horizontal span from the first to the last child.
    Bar,
    /// Sibling bar down to one child.
    Drop,
    /// Parent straight down to an only child.
    Straight,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub kind: ConnectorKind,
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout {
    pub title: String,
    pub cards: Vec<CoupleCard>,
    pub connectors: Vec<Connector>,
    pub size: Size,
}

struct Measure {
    width: f64,
    unit_width: f64,
    children: Vec<Measure>,
}

impl TreeLayout {
    pub fn compute(root: &TreeNode<'_>, today: NaiveDate) -> Self {
        let measure = measure(root);
        let mut layout = Self {
            title: format!("{} Family Tree", root.member.fullname),
            cards: Vec::with_capacity(root.node_count()),
            connectors: Vec::new(),
            size: Size::ZERO,
        };
        layout.place(root, &measure, 0.0, 0.0, today);
        let height = layout
            .cards
            .iter()
            .map(|card| card.rect.y1)
            .fold(0.0, f64::max);
        layout.size = Size::new(measure.width, height);
        layout
    }

    /// Rendered persons in display order: pre-order, member before spouse.
    pub fn persons(&self) -> impl Iterator<Item = &PersonCard> {
        self.cards.iter().flat_map(|card| card.persons())
    }

    pub fn person_count(&self) -> usize {
        self.persons().count()
    }

    pub fn person_at(&self, point: Point) -> Option<&PersonCard> {
        self.persons().find(|person| person.rect.contains(point))
    }

    pub fn find_person(&self, member_id: &str) -> Option<&PersonCard> {
        self.persons().find(|person| person.member_id == member_id)
    }

    fn place(&mut self, node: &TreeNode<'_>, measure: &Measure, left: f64, top: f64, today: NaiveDate) {
        let unit_left = left + (measure.width - measure.unit_width) / 2.0;
        let anchor_x = unit_left + measure.unit_width / 2.0;

        if node.member.depth as usize != node.level {
            tracing::warn!(
                member_id = %node.member.id,
                depth = node.member.depth,
                level = node.level,
                "member depth disagrees with tree level"
            );
        }

        let member = PersonCard::new(node.member, Point::new(unit_left, top), today);
        let spouse = node.spouse.map(|spouse| {
            PersonCard::new(
                spouse,
                Point::new(unit_left + CARD_WIDTH + MARRIAGE_GAP, top),
                today,
            )
        });
        self.cards.push(CoupleCard {
            member,
            spouse,
            level: node.level,
            depth: node.member.depth,
            rect: Rect::new(unit_left, top, unit_left + measure.unit_width, top + CARD_HEIGHT),
        });

        if node.children.is_empty() {
            return;
        }

        let bottom = top + CARD_HEIGHT;
        let child_top = bottom + LEVEL_GAP;
        let bar_y = bottom + 1.0;

        let mut x = left + (measure.width - children_width(&measure.children)) / 2.0;
        let mut anchors = Vec::with_capacity(node.children.len());
        for (child, child_measure) in node.children.iter().zip(&measure.children) {
            anchors.push(x + child_measure.width / 2.0);
            self.place(child, child_measure, x, child_top, today);
            x += child_measure.width + SIBLING_GAP;
        }

        if let [_] = anchors.as_slice() {
            self.connectors.push(Connector {
                kind: ConnectorKind::Straight,
                from: Point::new(anchor_x, bottom),
                to: Point::new(anchor_x, child_top),
            });
            return;
        }

        self.connectors.push(Connector {
            kind: ConnectorKind::Stem,
            from: Point::new(anchor_x, bottom),
            to: Point::new(anchor_x, bar_y),
        });
        if let (Some(&first), Some(&last)) = (anchors.first(), anchors.last()) {
            self.connectors.push(Connector {
                kind: ConnectorKind::Bar,
                from: Point::new(first, bar_y),
                to: Point::new(last, bar_y),
            });
        }
        for child_x in anchors {
            self.connectors.push(Connector {
                kind: ConnectorKind::Drop,
                from: Point::new(child_x, bar_y),
                to: Point::new(child_x, child_top),
            });
        }
    }
}

fn measure(node: &TreeNode<'_>) -> Measure {
    let unit_width = if node.spouse.is_some() {
        CARD_WIDTH.mul_add(2.0, MARRIAGE_GAP)
    } else {
        CARD_WIDTH
    };
    let children: Vec<Measure> = node.children.iter().map(measure).collect();
    Measure {
        width: unit_width.max(children_width(&children)),
        unit_width,
        children,
    }
}

#[allow(clippy::cast_precision_loss)]
fn children_width(children: &[Measure]) -> f64 {
    if children.is_empty() {
        return 0.0;
    }
    let gaps = (children.len() - 1) as f64 * SIBLING_GAP;
    children.iter().map(|c| c.width).sum::<f64>() + gaps
}
