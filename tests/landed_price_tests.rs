use aluminium_monitor::domain::{landed_price::*, spread::round_for_display, types::*};
use rust_decimal_macros::dec;

#[test]
fn test_mcx_landed_price_sums_components() {
    assert_eq!(
        mcx_landed_price(dec!(100), dec!(2.5), dec!(1.2)),
        dec!(103.7)
    );
    assert_eq!(
        mcx_landed_price(dec!(100), dec!(2.5), dec!(1.2)),
        mcx_landed_price(dec!(100), dec!(2.5), dec!(1.2))
    );
}

#[test]
fn test_lme_import_landed_price() {
    let landed = lme_import_landed_price(dec!(3257.66), dec!(83.156), dec!(7.5));

    assert_eq!(landed, dec!(3257.66) * dec!(83.156) / dec!(1000) * dec!(1.075));
    assert_eq!(round_for_display(landed), dec!(291.21));
}

#[test]
fn test_lme_import_without_duty_is_plain_conversion() {
    assert_eq!(
        lme_import_landed_price(dec!(3000), dec!(80), dec!(0)),
        dec!(240)
    );
}

#[test]
fn test_mcx_form_live_mode_uses_front_month() {
    let form = McxCalculatorForm::default();
    assert_eq!(form.mode, McxPriceMode::Live);
    assert_eq!(form.evaluate(Some(dec!(214.45))).unwrap(), dec!(218.15));
}

#[test]
fn test_mcx_form_live_mode_without_quote() {
    let result = McxCalculatorForm::default().evaluate(None);
    assert!(matches!(result, Err(MonitorError::InvalidInput(_))));
}

#[test]
fn test_mcx_form_manual_mode_ignores_live_price() {
    let form = McxCalculatorForm {
        mode: McxPriceMode::Manual,
        manual_price: "220.00".to_string(),
        ..McxCalculatorForm::default()
    };
    assert_eq!(form.evaluate(Some(dec!(214.45))).unwrap(), dec!(223.70));
}

#[test]
fn test_mcx_form_rejects_blank_and_text() {
    for manual_price in ["", "   ", "abc", "₹214"] {
        let form = McxCalculatorForm {
            mode: McxPriceMode::Manual,
            manual_price: manual_price.to_string(),
            ..McxCalculatorForm::default()
        };
        assert!(
            matches!(form.evaluate(None), Err(MonitorError::InvalidInput(_))),
            "{:?} should be rejected",
            manual_price
        );
    }
}

#[test]
fn test_lme_form_prefilled_defaults() {
    let form = LmeImportForm::prefilled(dec!(3257.66), dec!(83.1560));
    assert_eq!(form.duty_percent, "7.5");
    assert_eq!(
        round_for_display(form.evaluate().unwrap()),
        dec!(291.21)
    );
}

#[test]
fn test_lme_form_invalid_duty() {
    let form = LmeImportForm {
        duty_percent: "seven".to_string(),
        ..LmeImportForm::prefilled(dec!(3257.66), dec!(83.1560))
    };
    assert!(matches!(
        form.evaluate(),
        Err(MonitorError::InvalidInput(_))
    ));
}
