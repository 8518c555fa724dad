//! In-memory fallback store using DashMap

use dashmap::DashMap;
use enroll_types::Student;

/// Roll-number keyed student records held in process memory
///
/// No persistence and no eviction.
pub struct FallbackStore {
    data: DashMap<String, Student>,
}

impl FallbackStore {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    pub fn get(&self, roll_no: &str) -> Option<Student> {
        self.data.get(roll_no).map(|entry| entry.value().clone())
    }

    /// Snapshot of every record, ordered by roll number
    pub fn all(&self) -> Vec<Student> {
        let mut students: Vec<Student> = self
            .data
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        students.sort_by(|a, b| a.roll_no.cmp(&b.roll_no));
        students
    }

    /// Insert or overwrite
    pub fn set(&self, student: Student) {
        self.data.insert(student.roll_no.clone(), student);
    }

    /// Remove a record, returning whether one existed
    pub fn delete(&self, roll_no: &str) -> bool {
        self.data.remove(roll_no).is_some()
    }

    pub fn contains(&self, roll_no: &str) -> bool {
        self.data.contains_key(roll_no)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for FallbackStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(roll_no: &str, name: &str) -> Student {
        Student {
            roll_no: roll_no.to_string(),
            full_name: name.to_string(),
            class: "8C".to_string(),
            birth_date: "2011-02-03".to_string(),
            address: "Indore".to_string(),
            enrollment_date: "2024-06-01".to_string(),
        }
    }

    #[test]
    fn test_basic_operations() {
        let store = FallbackStore::new();

        store.set(student("1", "Meera"));
        assert_eq!(store.get("1").map(|s| s.full_name), Some("Meera".to_string()));
        assert!(store.contains("1"));

        // Non-existent key
        assert_eq!(store.get("2"), None);

        assert!(store.delete("1"));
        assert!(!store.delete("1"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_overwrites() {
        let store = FallbackStore::new();
        store.set(student("5", "Old Name"));
        store.set(student("5", "New Name"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("5").unwrap().full_name, "New Name");
    }

    #[test]
    fn test_all_is_a_sorted_snapshot() {
        let store = FallbackStore::new();
        assert!(store.all().is_empty());

        store.set(student("3", "C"));
        store.set(student("1", "A"));
        store.set(student("2", "B"));

        let snapshot = store.all();
        store.delete("2");

        let rolls: Vec<&str> = snapshot.iter().map(|s| s.roll_no.as_str()).collect();
        assert_eq!(rolls, vec!["1", "2", "3"]);
        assert_eq!(store.len(), 2);
    }
}
