use crate::catalog::Catalog;

/// Keys handed out to bodies in catalog order.
const DIGIT_KEYS: [char; 9] = ['1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Maps single-character keys to body names for focus selection.
///
/// Bindings keep catalog order so the on-screen legend and the lookup agree.
#[derive(Debug, Clone, Default)]
pub struct Keybinds {
    bindings: Vec<(String, char)>,
}

impl Keybinds {
    /// Bind `'1'..='9'` to the first nine bodies of the catalog.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let bindings = catalog
            .names()
            .zip(DIGIT_KEYS)
            .map(|(name, key)| (name.to_string(), key))
            .collect();
        Self { bindings }
    }

    /// Build from explicit `(body, key)` pairs, kept in the given order.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, char)>) -> Self {
        Self {
            bindings: pairs
                .into_iter()
                .map(|(name, key)| (name.to_string(), key))
                .collect(),
        }
    }

    /// Body bound to `key`. With duplicate bindings the earliest one wins.
    pub fn body_for(&self, key: char) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(_, bound)| *bound == key)
            .map(|(name, _)| name.as_str())
    }

    pub fn key_for(&self, body: &str) -> Option<char> {
        self.bindings
            .iter()
            .find(|(name, _)| name == body)
            .map(|(_, key)| *key)
    }

    /// `(body, key)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, char)> {
        self.bindings.iter().map(|(name, key)| (name.as_str(), *key))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CelestialBody;

    #[test]
    fn test_default_bindings() {
        let binds = Keybinds::from_catalog(&Catalog::solar_system());
        assert_eq!(binds.len(), 9);
        assert_eq!(binds.body_for('1'), Some("sun"));
        assert_eq!(binds.body_for('4'), Some("earth"));
        assert_eq!(binds.body_for('9'), Some("neptune"));
        assert_eq!(binds.key_for("mars"), Some('5'));
    }

    #[test]
    fn test_unbound_keys() {
        let binds = Keybinds::from_catalog(&Catalog::solar_system());
        assert_eq!(binds.body_for('0'), None);
        assert_eq!(binds.body_for('a'), None);
        assert_eq!(binds.key_for("pluto"), None);
    }

    #[test]
    fn test_more_than_nine_bodies() {
        let bodies = (0..12)
            .map(|i| CelestialBody::new(&format!("body{}", i), 1.0, i as f32 * 10.0, 0.001, 0))
            .collect();
        let binds = Keybinds::from_catalog(&Catalog::new(bodies));
        assert_eq!(binds.len(), 9);
        assert_eq!(binds.key_for("body10"), None);
    }

    #[test]
    fn test_duplicate_binding_first_wins() {
        let binds = Keybinds::from_pairs([("venus", '3'), ("earth", '3')]);
        assert_eq!(binds.body_for('3'), Some("venus"));
    }

    #[test]
    fn test_iteration_order() {
        let binds = Keybinds::from_catalog(&Catalog::solar_system());
        let keys: String = binds.iter().map(|(_, key)| key).collect();
        assert_eq!(keys, "123456789");
    }
}
