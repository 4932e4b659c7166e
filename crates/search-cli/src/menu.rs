use search_core::AreaId;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Quit,
    Search(AreaId, AreaId),
    StartOver,
}

/// Numbered round choices: `0` quits, `1..=n` are the area pairs in
/// lexicographic order, and `n + 1` starts over.
#[derive(Debug, Clone)]
pub struct Menu {
    pairs: Vec<(AreaId, AreaId)>,
}

impl Menu {
    pub fn new(area_count: usize) -> Self {
        let count = area_count.min(u8::MAX as usize);
        let pairs = (1..=count)
            .flat_map(|first| {
                (first + 1..=count)
                    .map(move |second| (AreaId::new(first as u8), AreaId::new(second as u8)))
            })
            .collect();
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(AreaId, AreaId)] {
        &self.pairs
    }

    pub fn start_over_number(&self) -> usize {
        self.pairs.len() + 1
    }

    pub fn parse(&self, input: &str) -> Option<MenuChoice> {
        let number: usize = input.trim().parse().ok()?;
        match number {
            0 => Some(MenuChoice::Quit),
            n if n == self.start_over_number() => Some(MenuChoice::StartOver),
            n => self
                .pairs
                .get(n - 1)
                .map(|&(first, second)| MenuChoice::Search(first, second)),
        }
    }

    pub fn render(&self, search_number: u32) -> String {
        let mut text = format!("\nSearch {search_number}\n\n");
        text.push_str("    Choose next areas to search:\n\n");
        text.push_str("    0 - Quit\n");
        for (index, (first, second)) in self.pairs.iter().enumerate() {
            let _ = writeln!(text, "    {} - Search Areas {first} & {second}", index + 1);
        }
        let _ = writeln!(text, "    {} - Start Over\n", self.start_over_number());
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(first: u8, second: u8) -> MenuChoice {
        MenuChoice::Search(AreaId::new(first), AreaId::new(second))
    }

    #[test]
    fn four_areas_yield_the_classic_seven_choices() {
        let menu = Menu::new(4);
        assert_eq!(menu.pairs().len(), 6);
        assert_eq!(menu.parse("0"), Some(MenuChoice::Quit));
        assert_eq!(menu.parse("1"), Some(pair(1, 2)));
        assert_eq!(menu.parse("2"), Some(pair(1, 3)));
        assert_eq!(menu.parse("3"), Some(pair(1, 4)));
        assert_eq!(menu.parse("4"), Some(pair(2, 3)));
        assert_eq!(menu.parse("5"), Some(pair(2, 4)));
        assert_eq!(menu.parse(" 6\n"), Some(pair(3, 4)));
        assert_eq!(menu.parse("7"), Some(MenuChoice::StartOver));
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        let menu = Menu::new(4);
        assert_eq!(menu.parse("8"), None);
        assert_eq!(menu.parse("-1"), None);
        assert_eq!(menu.parse("two"), None);
        assert_eq!(menu.parse(""), None);
    }

    #[test]
    fn render_lists_every_choice() {
        let text = Menu::new(3).render(2);
        assert!(text.contains("Search 2"));
        assert!(text.contains("0 - Quit"));
        assert!(text.contains("1 - Search Areas 1 & 2"));
        assert!(text.contains("3 - Search Areas 2 & 3"));
        assert!(text.contains("4 - Start Over"));
    }
}
