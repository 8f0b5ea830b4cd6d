/// Ordered name-to-item registry with exact lookup and substring selection.
///
/// Registration order is preserved; registering an existing name replaces
/// its item in place. Pattern semantics beyond "name contains" are left to
/// callers, this is only the thin selection layer over the tagging engine.
pub struct Registry<T> {
    entries: Vec<(String, T)>,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register<S>(&mut self, name: S, item: T)
    where
        S: Into<String>,
    {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = item;
        } else {
            self.entries.push((name, item));
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, item)| item)
    }

    /// All entries whose name contains `pattern`, in registration order. An
    /// empty pattern selects everything.
    pub fn select<'a>(&'a self, pattern: &'a str) -> impl Iterator<Item = (&'a str, &'a T)> + 'a {
        self.entries
            .iter()
            .filter(move |(n, _)| n.contains(pattern))
            .map(|(n, item)| (n.as_str(), item))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(n, item)| (n.as_str(), item))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_exact() {
        let mut r = Registry::new();
        r.register("cess_esp-mwe-2grams", 1);
        r.register("cess_esp-nomwe-2grams", 2);

        assert_eq!(Some(&1), r.get("cess_esp-mwe-2grams"));
        assert_eq!(None, r.get("cess_esp-mwe-3grams"));
    }

    #[test]
    fn test_registry_select_by_substring() {
        let mut r = Registry::new();
        r.register("cess_esp-mwe-1grams", 1);
        r.register("cess_esp-nomwe-1grams", 2);
        r.register("conll2002-mwe-1grams", 3);

        let names: Vec<&str> = r.select("cess").map(|(n, _)| n).collect();
        assert_eq!(vec!["cess_esp-mwe-1grams", "cess_esp-nomwe-1grams"], names);

        let all: Vec<&str> = r.select("").map(|(n, _)| n).collect();
        assert_eq!(3, all.len());
    }

    #[test]
    fn test_registry_register_replaces_in_place() {
        let mut r = Registry::new();
        r.register("a", 1);
        r.register("b", 2);
        r.register("a", 3);

        assert_eq!(2, r.len());
        assert_eq!(Some(&3), r.get("a"));
        let names: Vec<&str> = r.iter().map(|(n, _)| n).collect();
        assert_eq!(vec!["a", "b"], names);
    }
}
