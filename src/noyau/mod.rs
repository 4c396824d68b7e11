//! Noyau d'équivalence de réponses
//!
//! Organisation interne :
//! - options.rs     : développement ";" / "±" en branches (arbre Variante)
//! - normalise.rs   : notation brute (Unicode, LaTeX) -> chaîne canonique
//! - jetons.rs      : tokenisation
//! - rpn.rs         : shunting-yard + construction Expr
//! - expr.rs        : AST + fonctions résolues
//! - trig.rs        : famille trigonométrique + angles spéciaux + indéfini
//! - lecture.rs     : Expr -> f64 (angles, domaines)
//! - eval.rs        : pipeline complet d'une branche
//! - tolerance.rs   : politique numérique (TOML)
//! - comparaison.rs : comparateur + replis en couches
//! - erreurs.rs     : erreurs typées

pub mod comparaison;
pub mod erreurs;
pub mod eval;
pub mod expr;
pub mod jetons;
pub mod lecture;
pub mod normalise;
pub mod options;
pub mod rpn;
pub mod tolerance;
pub mod trig;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use comparaison::{check_with, is_answer_correct};
pub use erreurs::{ErreurComparaison, ErreurConfig, ErreurEval};
pub use eval::{evaluer_avec_demarche, evaluer_branche, Demarche};
pub use options::developper;
pub use tolerance::Tolerance;
