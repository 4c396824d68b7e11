//! Vérification d'équivalence de réponses mathématiques.
//!
//! ```
//! use verif_reponse::is_answer_correct;
//!
//! assert!(is_answer_correct("0,5", "1/2"));
//! assert!(is_answer_correct("±5", "5; -5"));
//! assert!(!is_answer_correct("2", "2; -2"));
//! ```

pub mod noyau;

pub use noyau::{check_with, is_answer_correct, Tolerance};
