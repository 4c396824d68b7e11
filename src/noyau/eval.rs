//! Noyau — évaluation (pipeline réel)
//!
//! branche brute -> normalise -> jetons -> RPN -> Expr -> lecture f64
//!
//! Remarque : une affectation en tête ("x=1") est lue comme son membre droit,
//! pour que "x=1; x=2" vaille "1; 2".

use super::erreurs::ErreurEval;
use super::expr::Fonction;
use super::jetons::{format_tokens, tokenize, Tok};
use super::lecture::{est_constante, lire};
use super::normalise::normaliser;
use super::rpn::{format_rpn, from_rpn, to_rpn};

#[derive(Default, Clone, Debug)]
pub struct Demarche {
    pub normalisee: String,
    pub jetons: String,
    pub rpn: String,
    pub arbre: String,
}

/// Évalue une expression DÉJÀ normalisée.
pub fn evaluer(normalisee: &str) -> Result<f64, ErreurEval> {
    evaluer_interne(normalisee, None)
}

/// Normalise puis évalue une branche brute.
pub fn evaluer_branche(branche: &str) -> Result<f64, ErreurEval> {
    evaluer(&normaliser(branche))
}

/// Comme evaluer_branche, avec les étapes intermédiaires (pour --explain).
/// La démarche est remplie jusqu'à l'étape qui a échoué.
pub fn evaluer_avec_demarche(branche: &str) -> (Result<f64, ErreurEval>, Demarche) {
    let mut d = Demarche {
        normalisee: normaliser(branche),
        ..Demarche::default()
    };
    let normalisee = d.normalisee.clone();
    let r = evaluer_interne(&normalisee, Some(&mut d));
    (r, d)
}

fn evaluer_interne(s: &str, mut demarche: Option<&mut Demarche>) -> Result<f64, ErreurEval> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ErreurEval::Vide);
    }

    // 1) Jetons
    let jetons = tokenize(s)?;
    let jetons = sans_affectation(&jetons);
    if let Some(d) = demarche.as_deref_mut() {
        d.jetons = format_tokens(jetons);
    }

    // 2) RPN
    let rpn = to_rpn(jetons)?;
    if let Some(d) = demarche.as_deref_mut() {
        d.rpn = format_rpn(&rpn);
    }

    // 3) AST (Expr)
    let expr = from_rpn(&rpn)?;
    if let Some(d) = demarche.as_deref_mut() {
        d.arbre = expr.to_string();
    }

    // 4) Lecture
    lire(&expr)
}

/// "x = …" : on garde le membre droit si x est un symbole libre
/// (ni fonction, ni constante).
fn sans_affectation(jetons: &[Tok]) -> &[Tok] {
    match jetons {
        [Tok::Ident(nom), Tok::Egal, reste @ ..]
            if Fonction::depuis_nom(nom).is_none() && !est_constante(nom) =>
        {
            reste
        }
        _ => jetons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(s: &str) -> f64 {
        evaluer_branche(s).unwrap_or_else(|e| panic!("evaluer_branche({s:?}) erreur: {e}"))
    }

    fn assert_proche(s: &str, attendu: f64) {
        let v = ok(s);
        if (v - attendu).abs() > 1e-9 {
            panic!("{s:?} = {v}, attendu {attendu}");
        }
    }

    #[test]
    fn notations_brutes() {
        assert_proche("8√3", 8.0 * 3f64.sqrt());
        assert_proche("\\frac{1}{4}", 0.25);
        assert_proche("2(3)", 6.0);
        assert_proche("0,5", 0.5);
        assert_proche("\\sqrt[3]{27}", 3.0);
        assert_proche("|-2|", 2.0);
        assert_proche("\\log_{2}(8)", 3.0);
        assert_proche("π", std::f64::consts::PI);
        assert_proche("6:3", 2.0);
    }

    #[test]
    fn affectation() {
        assert_proche("x=1", 1.0);
        assert_proche("x = -2.5", -2.5);
        assert!(evaluer_branche("pi=3").is_err());
        assert!(evaluer_branche("x=1=2").is_err());
    }

    #[test]
    fn degres() {
        assert_proche("sin(30°)", 0.5);
        assert_proche("sin 30°", 0.5);
        assert_proche("\\cos 60^\\circ", 0.5);
        assert!(matches!(
            evaluer_branche("tan(90°)"),
            Err(ErreurEval::Indefini("tan"))
        ));
    }

    #[test]
    fn echecs() {
        assert_eq!(evaluer_branche(""), Err(ErreurEval::Vide));
        assert_eq!(evaluer_branche("   "), Err(ErreurEval::Vide));
        assert_eq!(evaluer_branche("нет решений"), Err(ErreurEval::EnsembleVide));
        assert_eq!(evaluer_branche("∅"), Err(ErreurEval::EnsembleVide));
        assert!(matches!(evaluer_branche("2x"), Err(ErreurEval::Symbole(_))));
        assert!(evaluer_branche("[1,2]").is_err());
        assert!(evaluer_branche("x<3").is_err());
    }

    #[test]
    fn demarche_remplie() {
        let (r, d) = evaluer_avec_demarche("2\\cdot 3");
        assert_eq!(r, Ok(6.0));
        assert_eq!(d.normalisee, "2*3");
        assert_eq!(d.jetons, "2 * 3");
        assert_eq!(d.rpn, "2 3 *");
        assert_eq!(d.arbre, "(2 * 3)");

        let (r, d) = evaluer_avec_demarche("1+");
        assert!(r.is_err());
        assert_eq!(d.jetons, "1 +");
        assert!(d.rpn.is_empty());
    }
}
