/// A small civil-code corpus shared by the unit tests.
pub const CIVIL_CODE: &str = r#"{
    "sources": {
        "codigo_civil": {
            "nombre": "Código Civil",
            "tipo": "codigo",
            "normas": {
                "art1793": {
                    "id": "art1793",
                    "estructura": {
                        "accion": "entregar la cosa vendida al comprador",
                        "pasivo": "vendedor",
                        "activo": "comprador",
                        "objeto": "bien",
                        "deontico": "obligacion",
                        "condiciones": ["CompraVenta"]
                    },
                    "contexto": ["compraventa", "contratos"]
                },
                "art1824": {
                    "id": "art1824",
                    "estructura": {
                        "accion": "pagar el precio convenido al vendedor",
                        "pasivo": "comprador",
                        "activo": "vendedor",
                        "objeto": "precio",
                        "deontico": "obligacion",
                        "condiciones": ["compraventa"]
                    },
                    "contexto": ["compraventa"],
                    "derivadaDe": "codigo_civil.art1793"
                },
                "art1950": {
                    "id": "art1950",
                    "estructura": {
                        "accion": "mantener la cosa arrendada en estado de servir",
                        "pasivo": "arrendador",
                        "activo": "arrendatario",
                        "objeto": "inmueble",
                        "condiciones": ["Arrendamiento"]
                    },
                    "contexto": ["arrendamiento"]
                }
            }
        },
        "ley_consumidor": {
            "nombre": "Ley del Consumidor",
            "tipo": "ley",
            "normas": {
                "art12": {
                    "id": "art12",
                    "estructura": {
                        "accion": "abstenerse de publicidad engañosa",
                        "pasivo": "proveedor",
                        "activo": "consumidor",
                        "objeto": "servicio",
                        "deontico": "prohibicion",
                        "condiciones": ["CompraVenta"]
                    },
                    "contexto": ["derecho-consumidor"]
                }
            }
        }
    },
    "roleMappings": {
        "Arrendamiento": {
            "propietario": "arrendador",
            "usuario": ["arrendatario", "subarrendatario"]
        }
    },
    "roles": {
        "CompraVenta": ["comprador", "vendedor"]
    }
}"#;
