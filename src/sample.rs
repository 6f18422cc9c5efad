/// Informal Spanish RFQ used by `rfq-extract --sample` and the end-to-end tests.
pub const SAMPLE_RFQ: &str = "hola buenos dias!!

necesitamos cotizar un envio URGENTE de valencia españa al puerto de SANTOS brasil... son maquinarias pesadas de segunda mano aprox 2.5 toneladas + o -

tengo 3 maquinas:
- una cortadora que mide algo asi como 180x90x120 cm pesa 890kg mas o menos
- soldadora de 65kg (pequeña) 40x30x80
- compresor grande PESADO!!! 950kg aprox dimensiones 200x110x140 creo q son

TOTAL= mas o menos 1900kg pero pueden ser hasta 2200kg dependiendo de los accesorios

necesitamos que llegue antes del 15 de octubre por fabor es MUY urgente nuestro cliente ya esta esperando

pueden incluir SEGURO??? y el transporte hasta la fabrica en santos??

presupuesto???

saludos
juan martinez
WhatsApp: +34 666 123 456
Maquilogistics SL
valencia

PD: algunas maquinas tienen aceite residual pero ya las limpiamos";
