use scopebench::bench::templates::{
    alert_count_by_severity, alert_severity_histogram, image_risk_by_namespace,
};
use scopebench::query::{Query, ScopeLevel, ScopeSpec, Value};
use scopebench::scope::{ScopeEntry, inject_scope_filter};

fn scope() -> Vec<ScopeEntry> {
    vec![
        ScopeEntry::new("C1", "nsA"),
        ScopeEntry::new("C2", "nsC"),
        ScopeEntry::new("C1", "nsB"),
    ]
}

#[test]
fn join_template_gets_scope_filter_before_ordering() {
    let template = image_risk_by_namespace().query;
    let rendered = template.with_scope(&scope()).render();
    assert_eq!(
        rendered.text,
        "select distinct(images.Id) as Image_Sha, images.RiskScore as image_risk_score \
         from images \
         inner join deployments_containers on images.Id = deployments_containers.Image_Id \
         inner join deployments on deployments_containers.deployments_Id = deployments.Id \
         where ( ( deployments.ClusterId = $1 and \
         ( deployments.Namespace = $2 or deployments.Namespace = $3 ) ) or \
         ( deployments.ClusterId = $4 and ( deployments.Namespace = $5 ) ) ) \
         order by images.RiskScore desc limit 6"
    );
    let expected: Vec<Value> = ["C1", "nsA", "nsB", "C2", "nsC"]
        .into_iter()
        .map(|s| Value::Text(s.into()))
        .collect();
    assert_eq!(rendered.params, expected);
}

#[test]
fn scope_params_precede_template_params() {
    let template = alert_count_by_severity().query;
    let rendered = template.with_scope(&scope()).render();
    assert_eq!(rendered.params.len(), 5 + 3);
    assert_eq!(
        &rendered.params[5..],
        &[Value::Integer(3), Value::Integer(0), Value::Integer(3)]
    );
    assert!(rendered.text.ends_with(
        "and ( alerts.Policy_Severity = $6 and ( alerts.State = $7 or alerts.State = $8 ) ) )"
    ));
}

#[test]
fn grouped_template_keeps_group_by_after_injection() {
    let rendered = alert_severity_histogram().query.with_scope(&scope()).render();
    assert!(rendered.text.ends_with("group by alerts.Policy_Severity"));
    assert_eq!(rendered.marker_count(), rendered.params.len());
}

#[test]
fn empty_scope_renders_identically_to_template() {
    for template in [
        image_risk_by_namespace(),
        alert_count_by_severity(),
        alert_severity_histogram(),
    ] {
        let scoped = inject_scope_filter(&template.query, &[]);
        assert_eq!(scoped.render(), template.query.render());
    }
}

#[test]
fn unrecognized_scope_level_is_a_passthrough() {
    let spec: ScopeSpec = serde_json::from_str(
        r#"{"level": "deployment", "table": "t", "cluster_column": "ClusterId"}"#,
    )
    .expect("decode");
    assert_eq!(spec.level, ScopeLevel::None);
    let template = Query::select(&["*"]).from("t").scoped(spec);
    assert_eq!(template.with_scope(&scope()), template);
}

#[test]
fn injection_does_not_touch_the_template() {
    let template = alert_count_by_severity().query;
    let before = template.clone();
    let _ = template.with_scope(&scope());
    let _ = template.with_scope(&scope()[..1]);
    assert_eq!(template, before);
}
